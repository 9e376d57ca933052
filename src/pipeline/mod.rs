//! Pipeline entry points for scraper operations.
//!
//! - `run_crawler`: Discover show pages from the list and scrape them

pub mod crawl;

pub use crawl::run_crawler;
