// src/services/shows.rs

//! Show crawler service.
//!
//! Fetches discovered show pages with bounded concurrency, parses each
//! page and hands the record to the configured sinks. Pages that defeat
//! the parser are recorded in the skip ledger and the run continues.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{Config, Show};
use crate::services::listing::extract_show_links;
use crate::services::parser::ShowPageParser;
use crate::storage::{ShowSink, SkipLedger};
use crate::utils::http::{create_async_client, fetch_with_retry};

/// Summary of a crawl run.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    pub discovered: usize,
    pub scraped: usize,
    pub skipped: usize,
    pub fetch_failures: usize,
}

/// Service for crawling show pages from the show list.
pub struct ShowCrawler {
    config: Arc<Config>,
    client: Client,
    parser: ShowPageParser,
}

impl ShowCrawler {
    /// Create a new show crawler with the given configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = create_async_client(&config.crawler)?;
        let parser = ShowPageParser::new(&config.selectors)?;
        Ok(Self {
            config,
            client,
            parser,
        })
    }

    /// Fetch the show list page and extract show page URLs.
    pub async fn discover(&self) -> Result<Vec<String>> {
        let list_url = &self.config.site.list_url;
        log::info!("Fetching show list from {}", list_url);

        let body = fetch_with_retry(
            &self.client,
            list_url,
            self.config.crawler.max_retries,
            Duration::from_millis(self.config.crawler.request_delay_ms),
        )
        .await?;

        let document = Html::parse_document(&body);
        extract_show_links(&document, list_url, &self.config.site.show_link_pattern)
    }

    /// Fetch, parse and persist all given show pages concurrently,
    /// bounded by the configured concurrency.
    pub async fn fetch_all(
        &self,
        urls: Vec<String>,
        sinks: &[Box<dyn ShowSink>],
        ledger: &SkipLedger,
    ) -> Result<CrawlOutcome> {
        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);
        let concurrency = self.config.crawler.max_concurrent.max(1);
        let max_retries = self.config.crawler.max_retries;

        let mut outcome = CrawlOutcome {
            discovered: urls.len(),
            ..CrawlOutcome::default()
        };

        let mut pages = stream::iter(urls)
            .map(|url| async move {
                let result = fetch_with_retry(&self.client, &url, max_retries, delay).await;
                (url, result)
            })
            .buffer_unordered(concurrency);

        while let Some((url, result)) = pages.next().await {
            match result {
                Ok(body) => {
                    self.process_page(&url, &body, sinks, ledger, &mut outcome)
                        .await?;
                }
                Err(error) => {
                    outcome.fetch_failures += 1;
                    log::warn!("Failed to fetch {}: {}", url, error);
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(outcome)
    }

    /// Parse one fetched page and dispatch the record to the sinks.
    async fn process_page(
        &self,
        url: &str,
        body: &str,
        sinks: &[Box<dyn ShowSink>],
        ledger: &SkipLedger,
        outcome: &mut CrawlOutcome,
    ) -> Result<()> {
        log::info!("Parsing show page {}", url);

        match self.parser.parse(body, url) {
            Ok(show) => {
                self.store_record(&show, url, sinks, ledger, outcome).await?;
            }
            Err(error) => {
                log::error!("Failed to parse {}: {}. Skipping.", url, error);
                let subject = match &error {
                    AppError::Extract { context, .. } => context.clone(),
                    _ => url.to_string(),
                };
                ledger.record(&subject, url).await?;
                outcome.skipped += 1;
            }
        }

        Ok(())
    }

    /// Store a record in every sink. A failure in a required sink
    /// ledgers the record and stops; optional sinks only log.
    async fn store_record(
        &self,
        show: &Show,
        url: &str,
        sinks: &[Box<dyn ShowSink>],
        ledger: &SkipLedger,
        outcome: &mut CrawlOutcome,
    ) -> Result<()> {
        for sink in sinks {
            if let Err(error) = sink.store_show(show).await {
                if sink.required() {
                    log::error!(
                        "Failed to store '{}' to {}: {}. Skipping.",
                        show.name,
                        sink.name(),
                        error
                    );
                    ledger.record(&show.name, url).await?;
                    outcome.skipped += 1;
                    return Ok(());
                }
                log::error!(
                    "Couldn't store '{}' to {}: {}",
                    show.name,
                    sink.name(),
                    error
                );
            }
        }

        log::info!(
            "Scraped '{}' ({} episodes, {} cast entries)",
            show.name,
            show.episode_count(),
            show.cast.len()
        );
        outcome.scraped += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    fn test_config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    fn sample_show() -> Show {
        Show {
            name: "Example Show".to_string(),
            status: "Ended".to_string(),
            rating_value: 7.0,
            rating_count: 10,
            url: "https://eztv.ag/shows/1-example-show/".to_string(),
            ..Show::default()
        }
    }

    struct RecordingSink {
        fail: bool,
        required: bool,
        stored: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ShowSink for RecordingSink {
        async fn store_show(&self, show: &Show) -> Result<()> {
            if self.fail {
                return Err(AppError::config("sink unavailable"));
            }
            self.stored.lock().unwrap().push(show.name.clone());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }

        fn required(&self) -> bool {
            self.required
        }
    }

    #[test]
    fn test_new_rejects_invalid_selector_config() {
        let mut config = Config::default();
        config.selectors.name_selector = "[[invalid".to_string();
        assert!(ShowCrawler::new(Arc::new(config)).is_err());
    }

    #[tokio::test]
    async fn test_required_sink_failure_ledgers_record() {
        let tmp = TempDir::new().unwrap();
        let ledger = SkipLedger::new(tmp.path().join("skipped.txt"));
        let crawler = ShowCrawler::new(test_config()).unwrap();

        let stored = Arc::new(Mutex::new(Vec::new()));
        let sinks: Vec<Box<dyn ShowSink>> = vec![
            Box::new(RecordingSink {
                fail: true,
                required: true,
                stored: Arc::clone(&stored),
            }),
            Box::new(RecordingSink {
                fail: false,
                required: false,
                stored: Arc::clone(&stored),
            }),
        ];

        let show = sample_show();
        let mut outcome = CrawlOutcome::default();
        crawler
            .store_record(&show, &show.url, &sinks, &ledger, &mut outcome)
            .await
            .unwrap();

        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.scraped, 0);
        // The failing required sink stops dispatch before later sinks.
        assert!(stored.lock().unwrap().is_empty());

        let content = std::fs::read_to_string(tmp.path().join("skipped.txt")).unwrap();
        assert_eq!(content, "Example Show\nhttps://eztv.ag/shows/1-example-show/\n\n");
    }

    #[tokio::test]
    async fn test_optional_sink_failure_keeps_record() {
        let tmp = TempDir::new().unwrap();
        let ledger = SkipLedger::new(tmp.path().join("skipped.txt"));
        let crawler = ShowCrawler::new(test_config()).unwrap();

        let stored = Arc::new(Mutex::new(Vec::new()));
        let sinks: Vec<Box<dyn ShowSink>> = vec![
            Box::new(RecordingSink {
                fail: false,
                required: true,
                stored: Arc::clone(&stored),
            }),
            Box::new(RecordingSink {
                fail: true,
                required: false,
                stored: Arc::clone(&stored),
            }),
        ];

        let show = sample_show();
        let mut outcome = CrawlOutcome::default();
        crawler
            .store_record(&show, &show.url, &sinks, &ledger, &mut outcome)
            .await
            .unwrap();

        assert_eq!(outcome.scraped, 1);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(stored.lock().unwrap().as_slice(), ["Example Show"]);
        assert!(!tmp.path().join("skipped.txt").exists());
    }

    #[tokio::test]
    async fn test_unparsable_page_is_ledgered() {
        let tmp = TempDir::new().unwrap();
        let ledger = SkipLedger::new(tmp.path().join("skipped.txt"));
        let crawler = ShowCrawler::new(test_config()).unwrap();

        let sinks: Vec<Box<dyn ShowSink>> = Vec::new();
        let mut outcome = CrawlOutcome::default();
        let url = "https://eztv.ag/shows/9-broken/";
        crawler
            .process_page(url, "<html><body></body></html>", &sinks, &ledger, &mut outcome)
            .await
            .unwrap();

        assert_eq!(outcome.skipped, 1);
        let content = std::fs::read_to_string(tmp.path().join("skipped.txt")).unwrap();
        // No name was recovered, so the ledger falls back to the URL.
        assert_eq!(content, format!("{url}\n{url}\n\n"));
    }
}
