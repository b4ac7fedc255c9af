//! Progress indicator for install

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the manifest is fetched
///
/// Prints a single plain line in CI.
pub struct InstallProgress {
    bar: Option<ProgressBar>,
}

impl InstallProgress {
    pub fn new(ctx: &UiContext, version: &str, entries: usize) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}  {elapsed:.dim}")
            {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            bar.set_message(format!("Precaching {} entries for {}", entries, version));
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            println!("Precaching {} entries for {}...", entries, version);
            None
        };
        Self { bar }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

impl Drop for InstallProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
