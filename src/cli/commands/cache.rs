//! Cache command - inspect and evict partitions

use crate::cache::{CacheManager, PartitionStatus, PartitionSummary};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::PaviResult;
use crate::ui::{self, UiContext};
use crate::worker::OfflineWorker;
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> PaviResult<()> {
    let worker = OfflineWorker::from_config(config)?;

    match args.action {
        CacheAction::List { format } => list_partitions(worker.cache(), format).await,
        CacheAction::Evict { dry_run } => evict(worker.cache(), dry_run).await,
    }
}

async fn list_partitions(cache: &CacheManager, format: OutputFormat) -> PaviResult<()> {
    let partitions = cache.list_partitions().await?;

    match format {
        OutputFormat::Table => print_table(&partitions),
        OutputFormat::Json => print_json(&partitions)?,
        OutputFormat::Plain => print_plain(&partitions),
    }

    Ok(())
}

fn print_table(partitions: &[PartitionSummary]) {
    if partitions.is_empty() {
        println!("No cache partitions found.");
        return;
    }

    println!("{:<40} {:<10} {:>8}", "PARTITION", "STATUS", "ENTRIES");
    println!("{}", "-".repeat(60));

    for p in partitions {
        let status = match p.status {
            PartitionStatus::Current => style("current").green().to_string(),
            PartitionStatus::Stale => style("stale").yellow().to_string(),
            PartitionStatus::Foreign => style("foreign").dim().to_string(),
        };
        println!("{:<40} {:<10} {:>8}", p.name, status, p.entries);
    }

    println!();
    println!("Total: {} partition(s)", partitions.len());
}

fn print_json(partitions: &[PartitionSummary]) -> PaviResult<()> {
    #[derive(serde::Serialize)]
    struct PartitionJson<'a> {
        name: &'a str,
        status: String,
        entries: usize,
    }

    let rows: Vec<PartitionJson<'_>> = partitions
        .iter()
        .map(|p| PartitionJson {
            name: &p.name,
            status: p.status.to_string(),
            entries: p.entries,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn print_plain(partitions: &[PartitionSummary]) {
    for p in partitions {
        println!("{}", p.name);
    }
}

async fn evict(cache: &CacheManager, dry_run: bool) -> PaviResult<()> {
    let ctx = UiContext::detect();
    let current = cache.current_versions();

    if dry_run {
        let stale = cache.stale_partitions(&current).await?;
        if stale.is_empty() {
            println!("No stale partitions.");
            return Ok(());
        }
        println!("Would evict {} partition(s):", stale.len());
        for name in &stale {
            println!("  {} {}", style("•").red(), name);
        }
        println!();
        println!("Dry run - nothing deleted.");
        return Ok(());
    }

    let evicted = cache.evict_stale_partitions(&current).await?;
    if evicted.is_empty() {
        println!("No stale partitions.");
        return Ok(());
    }
    for name in &evicted {
        ui::step_ok(&ctx, &format!("Evicted {}", name));
    }
    Ok(())
}
