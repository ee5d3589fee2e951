//! CSV result sink.
//!
//! Persists the deduplicated record set of one crawl run as UTF-8 CSV with a
//! `title,link,published` header row. The destination file name is derived
//! from the site's host (`blog_articles_<host>.csv`), so separate crawls of
//! separate publications never clobber each other.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer};
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

use crate::error::ScrapeError;
use crate::models::ArticleRecord;

/// File name for a crawl of `site_url`, derived from its host.
pub fn output_filename(site_url: &Url) -> String {
    format!("blog_articles_{}.csv", site_url.host_str().unwrap_or("unknown"))
}

/// Serialize records to CSV bytes, header row first.
fn render(records: &[ArticleRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| e.into_error().into())
}

/// Persist `records` as `blog_articles_<host>.csv` under `output_dir`.
///
/// Returns the absolute path of the file written. A failure leaves the
/// in-memory record set untouched; callers report the error and keep the
/// data.
///
/// # Errors
///
/// [`ScrapeError::IoWrite`] carrying the destination path and the underlying
/// serialization or filesystem cause.
#[instrument(level = "info", skip(records), fields(count = records.len()))]
pub async fn write_records(
    records: &[ArticleRecord],
    site_url: &Url,
    output_dir: &Path,
) -> Result<PathBuf, ScrapeError> {
    let path = output_dir.join(output_filename(site_url));

    let bytes = render(records).map_err(|e| ScrapeError::io_write(&path, e))?;
    fs::write(&path, bytes)
        .await
        .map_err(|e| ScrapeError::io_write(&path, e))?;
    let absolute = fs::canonicalize(&path)
        .await
        .map_err(|e| ScrapeError::io_write(&path, e))?;

    info!(path = %absolute.display(), "Wrote CSV result file");
    Ok(absolute)
}

/// Read a previously written result file back into records.
pub fn read_records(path: &Path) -> Result<Vec<ArticleRecord>, ScrapeError> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| ScrapeError::io_write(path, e))?;
    reader
        .deserialize()
        .collect::<Result<Vec<ArticleRecord>, _>>()
        .map_err(|e| ScrapeError::io_write(path, e))
}
