//! Data model for extracted articles.
//!
//! The scraper produces exactly one structure, [`ArticleRecord`], with the
//! three columns the CSV export carries. Field order matters: the `csv`
//! writer derives the header row from it.

use serde::{Deserialize, Serialize};

/// Sentinel stored in [`ArticleRecord::published`] when no publication date
/// could be located inside an article block.
pub const DATE_NOT_FOUND: &str = "not-found";

/// One article entry extracted from a rendered publication page.
///
/// Records are deduplicated across scroll cycles on the `(title, link)` pair:
/// `link` is legitimately empty when a block carries no site-relative anchor,
/// and a title alone is not unique across a publication's archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Article headline, taken from the block's first level-2 heading.
    pub title: String,
    /// Absolute article URL resolved against the publication's base URL,
    /// or empty when the block had no site-relative anchor.
    pub link: String,
    /// Publication date in `Mon D, YYYY` form, or [`DATE_NOT_FOUND`].
    pub published: String,
}

impl ArticleRecord {
    /// The key under which duplicate extractions collapse, first-seen wins.
    pub fn dedup_key(&self) -> (String, String) {
        (self.title.clone(), self.link.clone())
    }
}
