//! CLI entry point for abzdok.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;
mod terminal;

use app_config::{Settings, load_default_file_config};
use cli::{Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let no_color = terminal::should_disable_color(
        cli.no_color,
        terminal::no_color_env_requested(),
        terminal::is_dumb_terminal(),
    );
    terminal::init_tracing(terminal::default_log_level(cli.verbose, cli.quiet), no_color);

    debug!(?cli, "CLI arguments parsed");

    let loaded = load_default_file_config()?;
    let settings = Settings::resolve(&cli, loaded.config.as_ref());
    debug!(?settings, config_loaded = loaded.loaded_from_file(), "settings resolved");

    match &cli.command {
        Command::Tsg(args) => commands::run_tsg_command(&settings, args, cli.quiet).await,
        Command::Form(args) => commands::run_form_command(&settings, args, cli.quiet).await,
        Command::Config {
            command: ConfigCommand::Show,
        } => {
            commands::run_config_show_command(&loaded, &settings)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
