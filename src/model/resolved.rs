use std::collections::BTreeMap;

use super::{release::RawRelease, Requirement};
use crate::version::split_release;

/// Prefix shared by every generated package and tarball name.
pub const PACKAGE_PREFIX: &str = "puppet";

/// The release selected for a module in one resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub package_name: String,
    pub version: String,
    /// Build counter found after the first hyphen of the forge version.
    pub release: Option<String>,
    /// Tarball location relative to the forge base URL.
    pub download_url: String,
    pub local_filename: String,
    pub dependencies: Vec<Requirement>,
}

impl ResolvedRelease {
    pub fn from_raw(package_name: &str, raw: RawRelease) -> Self {
        let (version, release) = split_release(&raw.version);
        let basename = raw.file.rsplit('/').next().unwrap_or(&raw.file);
        ResolvedRelease {
            package_name: package_name.to_owned(),
            version: version.to_owned(),
            release: release.map(str::to_owned),
            download_url: format!("{}/{}.tar.gz", package_name, raw.version),
            local_filename: format!("{}-{}", PACKAGE_PREFIX, basename),
            dependencies: raw.dependencies,
        }
    }

    /// Release number written to the spec, `1` unless the forge version had one.
    pub fn release_or_default(&self) -> &str {
        self.release.as_deref().unwrap_or("1")
    }

    /// RPM package name, also used by dependants in their `Requires:` lines.
    pub fn package_display_name(&self) -> String {
        package_display_name(&self.package_name)
    }
}

pub fn package_display_name(module_name: &str) -> String {
    format!("{}-{}", PACKAGE_PREFIX, module_name.replace('/', "-"))
}

/// Every module of one resolution run with exactly one release each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSet {
    releases: BTreeMap<String, ResolvedRelease>,
}

impl ResolvedSet {
    pub fn insert(&mut self, release: ResolvedRelease) -> Option<ResolvedRelease> {
        self.releases.insert(release.package_name.clone(), release)
    }

    pub fn get(&self, package_name: &str) -> Option<&ResolvedRelease> {
        self.releases.get(package_name)
    }

    pub(crate) fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.releases.keys().map(String::as_str)
    }
}

impl IntoIterator for ResolvedSet {
    type Item = ResolvedRelease;
    type IntoIter = std::collections::btree_map::IntoValues<String, ResolvedRelease>;

    fn into_iter(self) -> Self::IntoIter {
        self.releases.into_values()
    }
}
