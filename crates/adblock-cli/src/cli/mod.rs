//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    crate::logging::init(cli.verbose, cli.quiet)?;

    let config = Config::load(cli.config.as_deref())?;

    let ctx = commands::Context {
        config,
        api_token: cli.api_token,
        account_id: cli.account_id,
    };

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => commands::sync::execute(&ctx).await,
        Commands::Purge => commands::purge::execute(&ctx).await,
        Commands::Dump(args) => commands::dump::execute(&ctx, args).await,
    }
}
