//! Medium publication article extractor.
//!
//! Medium serves its reader pages with a platform-identifying `meta` tag and
//! renders each listed article inside an `article` element. Titles sit in a
//! level-2 heading, the article link is the first site-relative anchor in the
//! block, and the publication date appears somewhere in the block's text as
//! `Mon D, YYYY`.
//!
//! Every snapshot is checked for the platform marker, not just the first one:
//! in practice the site identity never changes mid-crawl, but the check is
//! per-snapshot state, not per-crawl state.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::ScrapeError;
use crate::models::{ArticleRecord, DATE_NOT_FOUND};

/// Metadata value Medium stamps on its reader pages.
const PLATFORM_MARKER: &str = "com.medium.reader";

static MARKER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[content="com.medium.reader"]"#).unwrap());
static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());

/// `Mon D, YYYY` and `Mon DD, YYYY` publication dates.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) \d{1,2}, \d{4}\b").unwrap()
});

/// Extract every article record visible in a rendered page snapshot.
///
/// Duplicate blocks within the snapshot collapse first-seen-wins on the
/// `(title, link)` key. Blocks without a level-2 heading yield no record and
/// are not an error.
///
/// # Errors
///
/// [`ScrapeError::NotMediumPublication`] when the snapshot lacks the Medium
/// platform marker; `base_url` is reported as the offending site.
pub fn extract_articles(html: &str, base_url: &Url) -> Result<Vec<ArticleRecord>, ScrapeError> {
    let document = Html::parse_document(html);

    if document.select(&MARKER_SELECTOR).next().is_none() {
        return Err(ScrapeError::NotMediumPublication {
            url: base_url.to_string(),
        });
    }

    let records: Vec<ArticleRecord> = document
        .select(&ARTICLE_SELECTOR)
        .filter_map(|block| extract_block(block, base_url))
        .unique_by(ArticleRecord::dedup_key)
        .collect();

    debug!(count = records.len(), marker = PLATFORM_MARKER, "Extracted articles from snapshot");
    Ok(records)
}

/// Extract one record from an article block, or `None` when the block has no
/// usable heading.
fn extract_block(block: ElementRef<'_>, base_url: &Url) -> Option<ArticleRecord> {
    let title = block
        .select(&HEADING_SELECTOR)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    if title.is_empty() {
        return None;
    }

    let link = block
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find(|href| href.starts_with('/'))
        .and_then(|href| resolve_article_link(base_url, href))
        .unwrap_or_default();

    let published = block
        .text()
        .find_map(|text| DATE_PATTERN.find(text).map(|m| m.as_str().to_string()))
        .unwrap_or_else(|| DATE_NOT_FOUND.to_string());

    Some(ArticleRecord {
        title,
        link,
        published,
    })
}

/// Resolve a site-relative href against the publication's base URL, keeping
/// only the path component (Medium decorates listing anchors with tracking
/// queries).
fn resolve_article_link(base_url: &Url, href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    base_url.join(path).ok().map(|resolved| resolved.to_string())
}
