//! Install command - precache the manifest

use crate::config::Config;
use crate::error::PaviResult;
use crate::ui::{self, InstallProgress, UiContext};
use crate::worker::OfflineWorker;

/// Execute the install command
pub async fn execute(config: &Config) -> PaviResult<()> {
    let ctx = UiContext::detect();
    let worker = OfflineWorker::from_config(config)?;

    let progress = InstallProgress::new(&ctx, &config.agent.version, worker.manifest().len());
    let result = worker.install().await;
    progress.finish();

    let report = result?;
    ui::step_ok_detail(
        &ctx,
        &format!("Installed {} entries", report.stored),
        &report.partition,
    );
    Ok(())
}
