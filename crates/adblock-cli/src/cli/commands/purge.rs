//! `cf-adblock purge` - remove everything owned by the adlist.

use adblock_sync::{Pipeline, Sources};
use anyhow::{Context as _, Result};
use tracing::info;

use super::Context;

pub async fn execute(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let pipeline = Pipeline::new(&ctx.config.adlist_name, Sources::default())
        .with_options(ctx.config.sync_options());

    let report = pipeline.purge(&client).await.context("Purge failed")?;

    info!(
        prefix = %pipeline.prefix(),
        deleted_policies = report.deleted_policies,
        deleted_lists = report.deleted_lists,
        "Purge complete"
    );
    Ok(())
}
