//! Activate command - evict stale partitions

use crate::config::Config;
use crate::error::PaviResult;
use crate::ui::{self, UiContext};
use crate::worker::OfflineWorker;

/// Execute the activate command
pub async fn execute(config: &Config) -> PaviResult<()> {
    let ctx = UiContext::detect();
    let worker = OfflineWorker::from_config(config)?;

    let report = worker.activate().await?;

    if report.evicted.is_empty() {
        ui::step_info(&ctx, "No stale partitions");
    }
    for name in &report.evicted {
        ui::step_ok(&ctx, &format!("Evicted {}", name));
    }
    ui::step_ok(
        &ctx,
        &format!("Version {} active", config.agent.version),
    );
    Ok(())
}
