//! # adblock-cli
//!
//! Command-line front end for the `adblock-sync` pipeline.
//!
//! ## Commands
//!
//! - **sync** (default): fetch sources and reconcile the gateway lists and rule
//! - **purge**: delete the rule and every list owned by the adlist
//! - **dump**: write the final domain list to a file without touching the API

pub mod cli;
pub mod config;
pub mod logging;

pub use cli::run;
