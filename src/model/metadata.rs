use std::collections::BTreeMap;

use serde::Deserialize;

use super::{nullable_string, Requirement};

/// Contents of the `metadata.json` shipped inside every module tarball.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleMetadata {
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub author: String,
    pub version: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub license: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    pub dependencies: Vec<Requirement>,
    /// Checksum per file shipped in the module, keyed by relative path.
    pub checksums: BTreeMap<String, String>,
}

impl ModuleMetadata {
    pub fn from_slice(data: &[u8]) -> Result<ModuleMetadata, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// Module name in `author-module` form, the way tarballs name their root
    /// directory.
    pub fn full_name(&self) -> String {
        self.name.replace('/', "-")
    }

    /// Module name without its `author-` prefix.
    pub fn short_name(&self) -> String {
        let full_name = self.full_name();
        match full_name.strip_prefix(&format!("{}-", self.author)) {
            Some(short) if !self.author.is_empty() && !short.is_empty() => short.to_owned(),
            _ => full_name,
        }
    }
}
