use std::{env, error::Error, path::PathBuf};

use home::home_dir;

use crate::{
    fetch::Workspace,
    registry::{ForgeClient, Registry, DEFAULT_FORGE_URL},
    rpmbuild::{RpmBuild, DEFAULT_BUILD_TOOL},
    Forge2Rpm,
};

#[derive(Default)]
pub struct Forge2RpmBuilder {
    forge_url: Option<String>,
    workspace: Option<PathBuf>,
    build_tool: Option<String>,
    registry: Option<Box<dyn Registry>>,
}

impl Forge2RpmBuilder {
    /// Base URL of the forge.
    ///
    /// Defaults to `https://forge.puppetlabs.com`.
    pub fn forge_url(mut self, url: impl Into<String>) -> Self {
        self.forge_url = Some(url.into());
        self
    }

    /// rpmbuild top directory receiving tarballs and spec files. Relative
    /// paths are taken from the current directory.
    ///
    /// Defaults to `$HOME/rpmbuild`.
    pub fn workspace(mut self, path: impl Into<PathBuf>) -> Self {
        self.workspace = Some(path.into());
        self
    }

    /// Executable used to build packages from spec files.
    ///
    /// Defaults to `rpmbuild`.
    pub fn build_tool(mut self, tool: impl Into<String>) -> Self {
        self.build_tool = Some(tool.into());
        self
    }

    /// Forge access to use instead of an HTTP client for `forge_url`.
    pub fn registry(mut self, registry: impl Registry + 'static) -> Self {
        self.registry = Some(Box::new(registry));
        self
    }

    pub fn try_build(self) -> Result<Forge2Rpm, Box<dyn Error>> {
        let Self {
            forge_url,
            workspace,
            build_tool,
            registry,
        } = self;

        let root = match workspace {
            Some(path) if path.is_absolute() => path,
            Some(path) => env::current_dir()?.join(path),
            None => default_workspace()?,
        };

        let registry: Box<dyn Registry> = match registry {
            Some(registry) => registry,
            None => Box::new(ForgeClient::new(
                forge_url.unwrap_or_else(|| DEFAULT_FORGE_URL.to_owned()),
            )?),
        };

        let build = RpmBuild::new(
            build_tool.unwrap_or_else(|| DEFAULT_BUILD_TOOL.to_owned()),
            &root,
        );

        Ok(Forge2Rpm {
            registry,
            workspace: Workspace::new(root),
            build,
        })
    }
}

fn default_workspace() -> Result<PathBuf, Box<dyn Error>> {
    let mut workspace =
        home_dir().ok_or("Could not find home dir. Please define $HOME env variable.")?;
    workspace.push("rpmbuild");
    Ok(workspace)
}
