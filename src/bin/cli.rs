//! showscrape CLI
//!
//! Local execution entry point for the TV-series scraper.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use showscrape::{
    error::Result,
    models::Config,
    pipeline,
    services::ShowPageParser,
    storage::{DocumentStore, SkipLedger},
};

/// showscrape - TV series metadata scraper
#[derive(Parser, Debug)]
#[command(
    name = "showscrape",
    version,
    about = "Scrapes TV series metadata from the EZTV show list"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the show list and scrape every discovered show page
    Crawl {
        /// Scrape at most this many shows
        #[arg(long)]
        limit: Option<usize>,

        /// Override the show list URL from the config
        #[arg(long)]
        list_url: Option<String>,
    },

    /// Validate configuration, selectors and patterns
    Validate,

    /// List stored shows, or print one show's stored document
    List {
        /// Name of the show to print
        name: Option<String>,
    },

    /// Show storage paths and record counts
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Crawl { limit, list_url } => {
            if let Some(url) = list_url {
                config.site.list_url = url;
            }
            config.validate()?;

            let config = Arc::new(config);
            pipeline::run_crawler(config, limit).await?;

            log::info!("Crawl complete!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            // Compile every selector and pattern so a bad override
            // fails here instead of mid-crawl.
            if let Err(e) = ShowPageParser::new(&config.selectors) {
                log::error!("Selector validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Selectors and patterns OK");

            log::info!("All validations passed!");
        }

        Command::List { name } => {
            let db_path = Path::new(&config.storage.database_path);
            if !db_path.exists() {
                log::error!(
                    "Document store not found at {}. Run 'crawl' first.",
                    db_path.display()
                );
                return Err(showscrape::error::AppError::config(
                    "Document store not found",
                ));
            }
            let store = DocumentStore::new(db_path)?;

            match name {
                Some(name) => match store.get_by_name(&name)? {
                    Some(show) => println!("{}", serde_json::to_string_pretty(&show)?),
                    None => log::warn!("No stored show named '{}'", name),
                },
                None => {
                    for show in store.list_shows()? {
                        println!("{}\t{}\t{}", show.name, show.url, show.stored_at);
                    }
                }
            }
        }

        Command::Info => {
            log::info!("Config file: {}", cli.config.display());
            log::info!("Export directory: {}", config.storage.output_dir);

            let db_path = Path::new(&config.storage.database_path);
            if db_path.exists() {
                let store = DocumentStore::new(db_path)?;
                log::info!(
                    "Document store: {} ({} shows)",
                    db_path.display(),
                    store.count()?
                );
            } else {
                log::info!("Document store: {} (not found)", db_path.display());
            }

            let ledger = SkipLedger::new(&config.storage.skipped_file);
            log::info!(
                "Skip ledger: {} ({} entries)",
                config.storage.skipped_file,
                ledger.count().await?
            );
        }
    }

    Ok(())
}
