mod cli;
mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};
use platform::config::{load_config_or_default, AppConfig, CONFIG_FILENAME};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    platform::logging::initialize(cli.log, cli.verbose);

    let config = resolve_config(&cli);
    let ok = match cli.command {
        Command::Convert(args) => platform::app::run_convert(&config, args)?,
        Command::Shell => {
            platform::app::run_shell(&config)?;
            true
        }
        Command::Health => platform::app::run_health(&config)?,
    };
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Config file values with the command-line overrides applied.
fn resolve_config(cli: &Cli) -> AppConfig {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let mut config = load_config_or_default(&path);
    if let Some(server) = &cli.server {
        config.server_url = server.clone();
    }
    if let Some(dir) = &cli.download_dir {
        config.download_dir = dir.clone();
    }
    config
}
