use std::{error::Error, path::PathBuf};

use clap::Parser;
use env_logger::{Env, Target};
use forge2rpm::{
    cli::args::{CliArgs, Command},
    config::Forge2RpmConfig,
    Forge2Rpm,
};

fn main() {
    let cli_args = CliArgs::parse();

    let default_filter = if cli_args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .target(Target::Stdout)
        .init();

    if let Err(e) = run(cli_args) {
        if log::log_enabled!(log::Level::Error) {
            log::error!("{}", e);
        } else {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli_args: CliArgs) -> Result<(), Box<dyn Error>> {
    let config = Forge2RpmConfig::load()?;

    let mut builder = Forge2Rpm::builder().build_tool(cli_args.rpmbuild);
    if let Some(url) = cli_args.forge_url.or(config.forge_url) {
        builder = builder.forge_url(url);
    }
    if let Some(workspace) = cli_args
        .workspace
        .map(PathBuf::from)
        .or(config.workspace_dir)
    {
        builder = builder.workspace(workspace);
    }
    let forge2rpm = builder.try_build()?;

    match cli_args.cmd {
        Command::Search(args) => forge2rpm.search(&args.term),
        Command::Create(args) => {
            let mode = args.build_mode(config.build_mode);
            forge2rpm.create(&args.package, args.version.as_deref(), mode)?;
            Ok(())
        }
    }
}
