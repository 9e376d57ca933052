// src/models/mod.rs

//! Domain models for the scraper application.

mod config;
mod selectors;
mod show;

// Re-export all public types
pub use config::{Config, CrawlerConfig, SiteConfig, StorageConfig};
pub use selectors::PageSelectors;
pub use show::{Episode, Show};
