use clap::{Args, Parser, Subcommand};

use crate::rpmbuild::{BuildMode, DEFAULT_BUILD_TOOL};

/// Turns Puppet forge modules and their dependencies into RPM spec files.
#[derive(Debug, Parser)]
#[command(version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub cmd: Command,
    /// Base URL of the forge
    #[arg(short, long)]
    pub forge_url: Option<String>,
    /// rpmbuild top directory receiving tarballs and spec files [default: $HOME/rpmbuild]
    #[arg(short, long)]
    pub workspace: Option<String>,
    /// Executable used to build packages from spec files
    #[arg(long, env = "FORGE2RPM_RPMBUILD", default_value = DEFAULT_BUILD_TOOL)]
    pub rpmbuild: String,
    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Searches the forge for modules
    Search(SearchArgs),
    /// Writes spec files for a module and all of its dependencies
    Create(CreateArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub term: String,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Module name, e.g. puppetlabs/stdlib
    pub package: String,
    /// Module version, defaults to the latest release
    pub version: Option<String>,
    /// Packages to build from the generated spec files [default: none]
    #[arg(short, long, value_enum)]
    pub build: Option<BuildMode>,
}

impl CreateArgs {
    /// The `--build` flag wins over the configured mode.
    pub fn build_mode(&self, configured: Option<BuildMode>) -> BuildMode {
        self.build.or(configured).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parse_search() {
        let args = CliArgs::try_parse_from(["forge2rpm", "search", "ntp"]).unwrap();
        match args.cmd {
            Command::Search(search) => assert_eq!(search.term, "ntp"),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!args.verbose);
        assert_eq!(args.forge_url, None);
    }

    #[test]
    fn parse_create() {
        let args = CliArgs::try_parse_from([
            "forge2rpm",
            "--forge-url",
            "https://forge.example.com",
            "-w",
            "/srv/rpmbuild",
            "create",
            "puppetlabs/ntp",
            "3.0.3",
            "--build",
            "rpm+srpm",
        ])
        .unwrap();
        assert_eq!(args.forge_url.as_deref(), Some("https://forge.example.com"));
        assert_eq!(args.workspace.as_deref(), Some("/srv/rpmbuild"));
        match args.cmd {
            Command::Create(create) => {
                assert_eq!(create.package, "puppetlabs/ntp");
                assert_eq!(create.version.as_deref(), Some("3.0.3"));
                assert_eq!(create.build, Some(BuildMode::All));
                assert_eq!(create.build_mode(Some(BuildMode::Srpm)), BuildMode::All);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn create_defaults() {
        let args = CliArgs::try_parse_from(["forge2rpm", "create", "puppetlabs/ntp"]).unwrap();
        match args.cmd {
            Command::Create(create) => {
                assert_eq!(create.version, None);
                assert_eq!(create.build, None);
                assert_eq!(create.build_mode(None), BuildMode::None);
                assert_eq!(create.build_mode(Some(BuildMode::Rpm)), BuildMode::Rpm);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn reject_unknown_build_mode() {
        assert!(
            CliArgs::try_parse_from(["forge2rpm", "create", "a/b", "--build", "deb"]).is_err()
        );
    }
}
