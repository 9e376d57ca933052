//! Local filesystem export for scraped shows.
//!
//! Writes one pretty-printed JSON document per show into the output
//! directory, plus the skip ledger recording shows the scraper gave up
//! on. Export files are written to a temp path and renamed so a crash
//! never leaves a half-written document behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Show;
use crate::storage::ShowSink;

/// Ensure a file's parent directory exists.
async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Filesystem sink writing one JSON document per show.
#[derive(Clone)]
pub struct LocalExport {
    output_dir: PathBuf,
}

impl LocalExport {
    /// Create a new export sink rooted at the given directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Full path for a show's export file.
    fn path(&self, show: &Show) -> PathBuf {
        self.output_dir.join(show.export_filename())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        ensure_parent(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl ShowSink for LocalExport {
    async fn store_show(&self, show: &Show) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(show)?;
        let path = self.path(show);
        self.write_bytes(&path, &bytes).await?;
        log::debug!("Exported '{}' to {}", show.name, path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json export"
    }
}

/// Append-only ledger of shows the scraper skipped.
///
/// Each entry is a subject line (the show name when one was recovered,
/// the page URL otherwise), the page URL, and a blank separator line.
#[derive(Clone)]
pub struct SkipLedger {
    path: PathBuf,
}

impl SkipLedger {
    /// Create a ledger handle for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Record one skipped show.
    pub async fn record(&self, subject: &str, url: &str) -> Result<()> {
        ensure_parent(&self.path).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{subject}\n{url}\n\n").as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }

    /// Number of recorded entries.
    pub async fn count(&self) -> Result<usize> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content
                .split("\n\n")
                .filter(|entry| !entry.trim().is_empty())
                .count()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
