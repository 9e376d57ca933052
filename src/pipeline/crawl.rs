// src/pipeline/crawl.rs

//! Show crawling pipeline.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::Config;
use crate::services::{CrawlOutcome, ShowCrawler};
use crate::storage::{DocumentStore, LocalExport, ShowSink, SkipLedger};

/// Run the show crawler end to end.
///
/// Discovers show pages from the configured list URL, scrapes each one
/// and persists every record to the JSON export directory and the
/// document store. `limit` truncates the discovered list for smoke
/// runs.
pub async fn run_crawler(config: Arc<Config>, limit: Option<usize>) -> Result<CrawlOutcome> {
    let start_time = Utc::now();

    let crawler = ShowCrawler::new(Arc::clone(&config))?;

    let mut urls = crawler.discover().await?;
    log::info!("Discovered {} show pages", urls.len());

    if let Some(limit) = limit {
        if urls.len() > limit {
            log::info!("Limiting run to the first {} shows", limit);
            urls.truncate(limit);
        }
    }

    let export = LocalExport::new(&config.storage.output_dir);
    let store = DocumentStore::new(Path::new(&config.storage.database_path))?;
    let sinks: Vec<Box<dyn ShowSink>> = vec![Box::new(export), Box::new(store)];
    let ledger = SkipLedger::new(&config.storage.skipped_file);

    let outcome = crawler.fetch_all(urls, &sinks, &ledger).await?;

    let elapsed = Utc::now().signed_duration_since(start_time);
    log::info!(
        "Crawl finished in {}s: {} discovered, {} scraped, {} skipped, {} fetch failures",
        elapsed.num_seconds(),
        outcome.discovered,
        outcome.scraped,
        outcome.skipped,
        outcome.fetch_failures
    );
    if outcome.skipped > 0 {
        log::info!(
            "Skipped pages are recorded in {}",
            config.storage.skipped_file
        );
    }

    Ok(outcome)
}
