//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Block ads on Cloudflare Zero Trust Gateway
///
/// Fetches the adlists named in lists.txt, removes anything found in the
/// whitelists and keeps one DNS block rule pointing at the result.
#[derive(Parser, Debug)]
#[command(name = "cf-adblock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Cloudflare API token (or set CF_API_TOKEN env var)
    #[arg(long, env = "CF_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Cloudflare account identifier (or set CF_IDENTIFIER env var)
    #[arg(long, env = "CF_IDENTIFIER", global = true)]
    pub account_id: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch the adlists and reconcile the gateway (default)
    Sync,

    /// Delete the block rule and every list owned by the adlist
    Purge,

    /// Write the final domain list to a file without calling the API
    Dump(DumpArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DumpArgs {
    /// Output file (defaults to `output_file` from the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["cf-adblock"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_dump_output() {
        let cli = Cli::try_parse_from(["cf-adblock", "dump", "-o", "out.txt"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Dump(DumpArgs {
                output: Some(PathBuf::from("out.txt"))
            }))
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cf-adblock", "purge", "--quiet", "-c", "x.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Purge));
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["cf-adblock", "-v", "-q"]).is_err());
    }
}
