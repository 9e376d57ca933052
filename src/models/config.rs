//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::PageSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Source site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Output and persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Show page selectors and patterns
    #[serde(default)]
    pub selectors: PageSelectors,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.site.list_url.trim().is_empty() {
            return Err(AppError::validation("site.list_url is empty"));
        }
        if url::Url::parse(&self.site.list_url).is_err() {
            return Err(AppError::validation("site.list_url is not a valid URL"));
        }
        if self.site.show_link_pattern.trim().is_empty() {
            return Err(AppError::validation("site.show_link_pattern is empty"));
        }
        if self.storage.output_dir.trim().is_empty() {
            return Err(AppError::validation("storage.output_dir is empty"));
        }
        if self.storage.database_path.trim().is_empty() {
            return Err(AppError::validation("storage.database_path is empty"));
        }
        self.selectors.validate()?;
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Retries per page after the first failed attempt
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
            max_retries: defaults::max_retries(),
        }
    }
}

/// Source site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// URL of the show list page
    #[serde(default = "defaults::list_url")]
    pub list_url: String,

    /// Substring a link URL must contain to count as a show page
    #[serde(default = "defaults::show_link_pattern")]
    pub show_link_pattern: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            list_url: defaults::list_url(),
            show_link_pattern: defaults::show_link_pattern(),
        }
    }
}

/// Output and persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for per-show JSON exports
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,

    /// Path of the SQLite document store
    #[serde(default = "defaults::database_path")]
    pub database_path: String,

    /// Path of the skip ledger for failed pages
    #[serde(default = "defaults::skipped_file")]
    pub skipped_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
            database_path: defaults::database_path(),
            skipped_file: defaults::skipped_file(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; showscrape/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        250
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn max_retries() -> u32 {
        3
    }

    // Site defaults
    pub fn list_url() -> String {
        "https://eztv.ag/showlist/".into()
    }
    pub fn show_link_pattern() -> String {
        "/shows/".into()
    }

    // Storage defaults
    pub fn output_dir() -> String {
        "output".into()
    }
    pub fn database_path() -> String {
        "shows.db".into()
    }
    pub fn skipped_file() -> String {
        "skipped_series.txt".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.crawler.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_pattern() {
        // An empty regex would compile fine and match everywhere, so
        // validation has to catch it before a crawl starts.
        let mut config = Config::default();
        config.selectors.season_pattern = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_list_url() {
        let mut config = Config::default();
        config.site.list_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.site.show_link_pattern, "/shows/");
        assert_eq!(config.storage.output_dir, "output");
    }

    #[test]
    fn partial_toml_overrides_single_field() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            max_concurrent = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.crawler.max_concurrent, 10);
        assert_eq!(config.crawler.timeout_secs, 30);
        assert_eq!(config.site.list_url, "https://eztv.ag/showlist/");
    }

    #[test]
    fn selector_override_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [selectors]
            name_selector = "h1.show-title"
            "#,
        )
        .unwrap();
        assert_eq!(config.selectors.name_selector, "h1.show-title");
        assert_eq!(
            config.selectors.airs_status_selector,
            "td.show_info_airs_status"
        );
    }
}
