use std::collections::BTreeMap;

use serde::Deserialize;

use super::{nullable_string, Requirement};

/// One published release of a module as listed by the forge's releases
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRelease {
    pub version: String,
    /// Path of the release tarball on the forge.
    pub file: String,
    #[serde(default)]
    pub dependencies: Vec<Requirement>,
}

/// Releases endpoint response: every module of the dependency graph, keyed by
/// module name, with its releases in forge order.
pub type ReleaseIndex = BTreeMap<String, Vec<RawRelease>>;

/// One row of the forge's module search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub full_name: String,
    #[serde(
        rename = "desc",
        alias = "description",
        default,
        deserialize_with = "nullable_string"
    )]
    pub description: String,
}
