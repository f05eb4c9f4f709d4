use std::fmt::Display;

use serde::{Deserialize, Deserializer};

pub mod metadata;
pub mod release;
pub mod resolved;

/// A dependency on another forge module as written by the forge or by a
/// module's `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawRequirement")]
pub struct Requirement {
    pub name: String,
    pub version_requirement: Option<String>,
}

impl Requirement {
    pub fn new(name: impl Into<String>, version_requirement: Option<&str>) -> Self {
        Requirement {
            name: name.into(),
            version_requirement: version_requirement.map(str::to_owned),
        }
    }
}

impl Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version_requirement {
            Some(requirement) => write!(f, "{} {}", self.name, requirement),
            None => f.write_str(&self.name),
        }
    }
}

/// Older forge responses list dependencies as `[name, requirement]` pairs.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRequirement {
    Object {
        name: String,
        #[serde(default)]
        version_requirement: Option<String>,
    },
    Pair(String, Option<String>),
}

impl From<RawRequirement> for Requirement {
    fn from(raw: RawRequirement) -> Self {
        match raw {
            RawRequirement::Object {
                name,
                version_requirement,
            }
            | RawRequirement::Pair(name, version_requirement) => Requirement {
                name,
                version_requirement,
            },
        }
    }
}

/// Reads an optional string field, mapping `null` to an empty string.
pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
