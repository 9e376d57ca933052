// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page and return its body as text.
///
/// Non-success status codes are treated as errors.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// Fetch a page, retrying failed attempts a bounded number of times.
///
/// `max_retries` counts attempts after the first one; `delay` is slept
/// between attempts.
pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    max_retries: u32,
    delay: Duration,
) -> Result<String> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match fetch_text(client, url).await {
            Ok(body) => return Ok(body),
            Err(error) if attempt <= max_retries => {
                log::warn!(
                    "Fetch failed for {} (attempt {}/{}): {}",
                    url,
                    attempt,
                    max_retries + 1,
                    error
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(error) => return Err(error),
        }
    }
}
