use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment, File, FileFormat};
use home::home_dir;
use serde::Deserialize;

use crate::rpmbuild::BuildMode;

const CONFIG_FILE_NAME: &str = ".forge2rpm.toml";

/// Settings read from `$HOME/.forge2rpm.toml` and `FORGE2RPM_*` environment
/// variables, the latter taking precedence. Command line flags override both.
pub struct Forge2RpmConfig {
    pub forge_url: Option<String>,
    pub workspace_dir: Option<PathBuf>,
    pub build_mode: Option<BuildMode>,
}

impl Forge2RpmConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config_file = home_dir().map(|home| home.join(CONFIG_FILE_NAME));
        let raw_config = RawConfig::load(config_file.as_deref(), None)?;

        Ok(Self {
            forge_url: raw_config.forge.url,
            workspace_dir: raw_config.workspace.dir,
            build_mode: raw_config.build.mode,
        })
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    forge: ForgeConfig,
    #[serde(default)]
    workspace: WorkspaceConfig,
    #[serde(default)]
    build: BuildConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct ForgeConfig {
    url: Option<String>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct WorkspaceConfig {
    dir: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct BuildConfig {
    mode: Option<BuildMode>,
}

impl RawConfig {
    fn load(file: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(file).format(FileFormat::Toml).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("FORGE2RPM")
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
