//! cf-adblock - block ads on Cloudflare Zero Trust Gateway
//!
//! Turns public adlists into gateway block lists and a DNS block rule.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    adblock_cli::run().await
}
