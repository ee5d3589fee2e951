//! Error taxonomy for the scraper.
//!
//! Every fatal condition the crawl can hit maps to one [`ScrapeError`]
//! variant. The crawl loop aborts on the first fatal error and propagates it;
//! nothing is retried. The only silently tolerated case is an article block
//! without a heading, which the extractor skips without producing a record.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Fatal conditions surfaced by the crawl pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The candidate URL failed syntactic validation; the crawl never starts.
    #[error("the given URL '{0}' appears to be invalid")]
    InvalidUrl(String),

    /// A page snapshot lacked the Medium platform marker.
    #[error("'{url}' does not appear to be a Medium publication")]
    NotMediumPublication { url: String },

    /// Communication with the rendering engine failed.
    #[error("rendering engine failure: {0}")]
    Engine(#[from] EngineError),

    /// The result file could not be written. The extracted records are still
    /// held in memory by the caller.
    #[error("failed to write results to {}: {source}", .path.display())]
    IoWrite {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ScrapeError {
    /// Create an [`ScrapeError::IoWrite`] from any underlying cause.
    pub fn io_write(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::IoWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_message_names_the_candidate() {
        let err = ScrapeError::InvalidUrl("htp:/nope".to_string());
        assert_eq!(
            err.to_string(),
            "the given URL 'htp:/nope' appears to be invalid"
        );
    }

    #[test]
    fn test_io_write_carries_the_path() {
        let err = ScrapeError::io_write(
            "/tmp/blog_articles_example.com.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("blog_articles_example.com.csv"));
    }
}
