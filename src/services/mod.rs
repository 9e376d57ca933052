//! Service layer for the scraper application.
//!
//! This module contains the business logic for:
//! - Show list discovery (`extract_show_links`)
//! - Show page parsing (`ShowPageParser`)
//! - Show crawling (`ShowCrawler`)

pub mod listing;
pub mod parser;
mod shows;

pub use listing::extract_show_links;
pub use parser::ShowPageParser;
pub use shows::{CrawlOutcome, ShowCrawler};
