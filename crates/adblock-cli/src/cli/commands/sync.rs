//! `cf-adblock sync` - reconcile the gateway with the adlists.

use adblock_sync::{RuleChange, SyncError, SyncOutcome};
use anyhow::{Context as _, Result};
use std::time::Duration;
use tracing::{error, info, warn};

use super::Context;

pub async fn execute(ctx: &Context) -> Result<()> {
    // Everything that can fail locally fails here, before any request
    let client = ctx.client()?;
    let pipeline = ctx.pipeline()?;
    let fetcher = ctx.fetcher()?;

    let attempts = ctx.config.attempts.max(1);
    let delay = Duration::from_secs(ctx.config.retry_delay_secs);
    let mut attempt = 1;

    loop {
        match pipeline.run(&fetcher, &client).await {
            Ok(outcome) => {
                report(&outcome);
                return Ok(());
            }
            Err(err) if attempt < attempts && is_worth_rerunning(&err) => {
                warn!(attempt, attempts, error = %err, "Run failed, retrying in {}s", delay.as_secs());
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                error!(attempt, error = %err, "Giving up");
                return Err(err).context("Sync failed");
            }
        }
    }
}

/// Failures that another run cannot fix are not retried
fn is_worth_rerunning(err: &SyncError) -> bool {
    match err {
        SyncError::Consistency { .. } | SyncError::TooManyDomains { .. } | SyncError::Config(_) => {
            false
        }
        SyncError::Gateway(gateway) => !gateway.is_auth_error(),
        SyncError::Fetch { .. } | SyncError::Io(_) => true,
    }
}

fn report(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Skipped { domains } => {
            info!(domains, "Gateway already up to date");
        }
        SyncOutcome::Applied(report) => {
            let rule = match &report.rule {
                RuleChange::Created { id } => format!("created {id}"),
                RuleChange::Updated { id } => format!("updated {id}"),
                RuleChange::Unchanged => "not set".to_string(),
            };
            info!(
                deleted_lists = report.deleted_lists,
                created_lists = report.created_lists.len(),
                skipped_lists = report.skipped_lists.len(),
                rule = %rule,
                "Sync applied"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_client::GatewayError;

    #[test]
    fn test_rerun_policy() {
        assert!(is_worth_rerunning(&SyncError::Fetch {
            url: "https://a.example".into(),
            reason: "HTTP 502".into(),
        }));
        assert!(is_worth_rerunning(&SyncError::Gateway(GatewayError::Timeout(
            "slow".into()
        ))));
        assert!(!is_worth_rerunning(&SyncError::Gateway(
            GatewayError::Unauthorized
        )));
        assert!(!is_worth_rerunning(&SyncError::Consistency {
            prefix: "[AdBlock-x]".into(),
            found: 2,
        }));
        assert!(!is_worth_rerunning(&SyncError::TooManyDomains {
            count: 2,
            max: 1,
        }));
    }
}
