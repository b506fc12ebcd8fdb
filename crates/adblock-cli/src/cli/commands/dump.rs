//! `cf-adblock dump` - write the final domain list locally.

use adblock_sync::write_domains;
use anyhow::{Context as _, Result};

use super::Context;
use crate::cli::args::DumpArgs;

pub async fn execute(ctx: &Context, args: DumpArgs) -> Result<()> {
    let pipeline = ctx.pipeline()?;
    let fetcher = ctx.fetcher()?;
    let output = args.output.unwrap_or_else(|| ctx.config.output_file.clone());

    let domains = pipeline
        .collect_domains(&fetcher)
        .await
        .context("Failed to collect domains")?;

    write_domains(&output, &domains)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
