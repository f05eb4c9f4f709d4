use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    model::resolved::{ResolvedRelease, ResolvedSet},
    registry::{self, Registry, TransportError},
    version::latest,
};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("No releases found for {0}")]
    MissingVersion(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Picks one release for `module` and for every module the forge lists in
/// its dependency graph.
///
/// The forge is queried once: its releases endpoint already answers with the
/// whole transitive graph, keyed by module name.
pub fn resolve<R: Registry + ?Sized>(
    registry: &R,
    module: &str,
    version: Option<&str>,
) -> Result<ResolvedSet, ResolveError> {
    match version {
        Some(version) => info!("Resolving {} pinned to {}", module, version),
        None => info!("Resolving {}", module),
    }

    let index = registry::releases(registry, module, version)?;
    if index.is_empty() {
        return Err(ResolveError::MissingVersion(module.to_owned()));
    }

    let mut resolved = ResolvedSet::default();
    for (name, releases) in index {
        let candidates = releases.len();
        let selected = latest(releases, |release| release.version.as_str())
            .ok_or_else(|| ResolveError::MissingVersion(name.clone()))?;
        if candidates > 1 {
            debug!(
                "Selected {} {} out of {} releases",
                name, selected.version, candidates
            );
        }

        let release = ResolvedRelease::from_raw(&name, selected);
        info!(
            "Resolved {} to {}-{}",
            release.package_name,
            release.version,
            release.release_or_default()
        );
        if resolved.insert(release).is_some() {
            warn!("Module {} was listed twice by the forge", name);
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        model::Requirement,
        registry::{fake::FakeRegistry, RELEASES_ENDPOINT},
    };

    use pretty_assertions::assert_eq;

    fn registry(response: serde_json::Value) -> FakeRegistry {
        FakeRegistry::default().with_response(RELEASES_ENDPOINT, response)
    }

    #[test]
    fn resolve_two_modules() {
        let registry = registry(json!({
            "a": [{"version": "1.0.0", "file": "a-1.0.0.tgz", "dependencies": []}],
            "b": [{
                "version": "2.1.0-3",
                "file": "b-2.1.0.tgz",
                "dependencies": [{"name": "a", "version_requirement": ">=1.0.0"}]
            }]
        }));

        let resolved = resolve(&registry, "b", None).unwrap();

        assert_eq!(resolved.package_names().collect::<Vec<_>>(), vec!["a", "b"]);
        let a = resolved.get("a").unwrap();
        assert_eq!(a.version, "1.0.0");
        assert_eq!(a.release, None);
        assert_eq!(a.release_or_default(), "1");
        assert_eq!(a.download_url, "a/1.0.0.tar.gz");
        assert_eq!(a.local_filename, "puppet-a-1.0.0.tgz");

        let b = resolved.get("b").unwrap();
        assert_eq!(b.version, "2.1.0");
        assert_eq!(b.release.as_deref(), Some("3"));
        assert_eq!(
            b.dependencies,
            vec![Requirement::new("a", Some(">=1.0.0"))]
        );
    }

    #[test]
    fn resolve_selects_latest_release() {
        let registry = registry(json!({
            "puppetlabs/stdlib": [
                {"version": "1.0.0", "file": "/r/puppetlabs-stdlib-1.0.0.tar.gz"},
                {"version": "4.10.0", "file": "/r/puppetlabs-stdlib-4.10.0.tar.gz"},
                {"version": "4.9.1", "file": "/r/puppetlabs-stdlib-4.9.1.tar.gz"},
                {"version": "4.10.0-beta", "file": "/r/puppetlabs-stdlib-4.10.0-beta.tar.gz"}
            ]
        }));

        let resolved = resolve(&registry, "puppetlabs/stdlib", None).unwrap();

        let stdlib = resolved.get("puppetlabs/stdlib").unwrap();
        assert_eq!(stdlib.version, "4.10.0");
        assert_eq!(stdlib.local_filename, "puppet-puppetlabs-stdlib-4.10.0.tar.gz");
        assert_eq!(stdlib.download_url, "puppetlabs/stdlib/4.10.0.tar.gz");
    }

    #[test]
    fn resolve_keeps_every_module_once() {
        let registry = registry(json!({
            "x": [{"version": "1", "file": "x-1.tgz"}, {"version": "2", "file": "x-2.tgz"}],
            "y": [{"version": "1", "file": "y-1.tgz"}],
            "z": [{"version": "abc", "file": "z.tgz"}]
        }));

        let resolved = resolve(&registry, "x", None).unwrap();

        assert_eq!(resolved.len(), 3);
        assert_eq!(
            resolved.package_names().collect::<Vec<_>>(),
            vec!["x", "y", "z"]
        );
        assert_eq!(registry.requests().len(), 1);
    }

    #[test]
    fn resolve_empty_response() {
        let registry = registry(json!({}));
        let error = resolve(&registry, "nothing/here", Some("1.0.0")).unwrap_err();
        assert!(
            matches!(&error, ResolveError::MissingVersion(name) if name == "nothing/here"),
            "{error}"
        );
    }

    #[test]
    fn resolve_module_without_releases() {
        let registry = registry(json!({
            "a": [{"version": "1.0.0", "file": "a-1.0.0.tgz"}],
            "b": []
        }));
        let error = resolve(&registry, "a", None).unwrap_err();
        assert!(matches!(&error, ResolveError::MissingVersion(name) if name == "b"));
    }

    #[test]
    fn resolve_transport_failure() {
        let registry = FakeRegistry::default();
        let error = resolve(&registry, "a", None).unwrap_err();
        assert!(matches!(error, ResolveError::Transport(_)));
    }
}
