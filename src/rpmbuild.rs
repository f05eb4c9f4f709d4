use std::{
    fmt::Display,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use clap::ValueEnum;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BUILD_TOOL: &str = "rpmbuild";

/// Which packages to build from a spec file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Only write the spec files.
    #[default]
    None,
    /// Binary RPM.
    Rpm,
    /// Source RPM.
    Srpm,
    /// Binary and source RPMs.
    #[value(name = "rpm+srpm")]
    #[serde(rename = "rpm+srpm")]
    All,
}

impl BuildMode {
    fn flag(self) -> Option<&'static str> {
        match self {
            BuildMode::None => None,
            BuildMode::Rpm => Some("-bb"),
            BuildMode::Srpm => Some("-bs"),
            BuildMode::All => Some("-ba"),
        }
    }
}

impl Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildMode::None => f.write_str("none"),
            BuildMode::Rpm => f.write_str("rpm"),
            BuildMode::Srpm => f.write_str("srpm"),
            BuildMode::All => f.write_str("rpm+srpm"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BuildToolError {
    #[error("Could not run {tool} for {spec}: {source}")]
    Spawn {
        tool: String,
        spec: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} failed for {spec} with {status}")]
    Failed {
        tool: String,
        spec: PathBuf,
        status: ExitStatus,
    },
}

/// Runs the native package build for one spec file.
pub struct RpmBuild {
    tool: String,
    top_dir: PathBuf,
}

impl RpmBuild {
    /// `top_dir` must be absolute, it becomes rpmbuild's `_topdir`.
    pub fn new(tool: impl Into<String>, top_dir: impl Into<PathBuf>) -> Self {
        RpmBuild {
            tool: tool.into(),
            top_dir: top_dir.into(),
        }
    }

    pub fn invoke(&self, spec: &Path, mode: BuildMode) -> Result<(), BuildToolError> {
        let Some(flag) = mode.flag() else {
            debug!("Not building {}", spec.display());
            return Ok(());
        };

        info!("Building {} ({})", spec.display(), mode);
        let status = Command::new(&self.tool)
            .arg("--define")
            .arg(format!("_topdir {}", self.top_dir.display()))
            .arg(flag)
            .arg(spec)
            .status()
            .map_err(|source| BuildToolError::Spawn {
                tool: self.tool.clone(),
                spec: spec.to_path_buf(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildToolError::Failed {
                tool: self.tool.clone(),
                spec: spec.to_path_buf(),
                status,
            })
        }
    }
}
