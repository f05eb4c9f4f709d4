use std::error::Error;

use crate::{
    cli::command_handlers::{do_create, do_search},
    fetch::{PackageOutcome, Workspace},
    registry::Registry,
    rpmbuild::{BuildMode, RpmBuild},
};

mod builder;

pub use builder::Forge2RpmBuilder;

pub struct Forge2Rpm {
    registry: Box<dyn Registry>,
    workspace: Workspace,
    build: RpmBuild,
}

impl Forge2Rpm {
    pub fn builder() -> Forge2RpmBuilder {
        Forge2RpmBuilder::default()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Prints the forge modules matching `term`
    pub fn search(&self, term: &str) -> Result<(), Box<dyn Error>> {
        do_search(&*self.registry, term)
    }

    /// Writes spec files for `package` and all of its dependencies into the
    /// workspace, then builds them according to `mode`
    pub fn create(
        &self,
        package: &str,
        version: Option<&str>,
        mode: BuildMode,
    ) -> Result<Vec<PackageOutcome>, Box<dyn Error>> {
        do_create(
            &*self.registry,
            &self.workspace,
            &self.build,
            package,
            version,
            mode,
        )
    }
}
