//! Crawl loop: scroll, snapshot, extract, decide whether to keep going.
//!
//! The target pages re-render their entire article list on every scroll step
//! instead of appending to it, so each snapshot re-yields everything already
//! seen. The loop therefore merges each extraction into an accumulator keyed
//! on `(title, link)`, first occurrence wins, and stops once a scroll round
//! no longer grows the page.
//!
//! All mutable crawl state lives in a [`CrawlState`] private to this module;
//! nothing persists across crawl invocations.

use std::collections::HashSet;
use std::io::{self, Write};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, instrument};
use url::Url;

use crate::engine::{EngineError, RenderingEngine};
use crate::error::ScrapeError;
use crate::models::ArticleRecord;
use crate::progress;
use crate::scrapers::medium;

/// Script that jumps the viewport to the bottom of the document.
const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Script that samples the document's current scroll height.
const SCROLL_HEIGHT: &str = "return document.body.scrollHeight";

/// Tunables for the scroll-and-wait cadence.
///
/// Lazy-loaded content takes a moment to render after a scroll, so heights
/// are only compared after `scrolls_before_check` scroll-and-pause steps.
/// Checking after a single immediate scroll terminates crawls prematurely.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Pause after each scroll command.
    pub scroll_pause: Duration,
    /// Scroll-and-pause steps per height comparison.
    pub scrolls_before_check: u32,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            scroll_pause: Duration::from_secs(2),
            scrolls_before_check: 2,
        }
    }
}

/// Mutable state owned by one crawl run.
struct CrawlState {
    /// Last observed page scroll-height sample.
    last_height: i64,
    /// Dedup keys of every record accumulated so far.
    seen: HashSet<(String, String)>,
    /// Accumulated records in first-seen order.
    records: Vec<ArticleRecord>,
    /// Completed scroll-wait-extract cycles.
    cycles: u32,
}

/// Decide whether further scrolling can still reveal new content.
///
/// Equal height samples mean the last scroll round revealed nothing and the
/// crawl should stop.
pub fn should_continue(previous_height: i64, current_height: i64) -> bool {
    previous_height != current_height
}

/// Crawl an infinite-scroll publication page and return its article records
/// in first-seen order.
///
/// Drives `engine` through repeated scroll rounds, extracting records from
/// each full-page snapshot and merging them into the accumulator. One
/// progress line is emitted per cycle.
///
/// # Errors
///
/// * [`ScrapeError::NotMediumPublication`] when any snapshot lacks the
///   platform marker.
/// * [`ScrapeError::Engine`] when the engine fails to scroll, sample, or
///   snapshot. Nothing is retried.
///
/// On any error the engine session is left open; the caller is responsible
/// for closing it on every exit path.
#[instrument(level = "info", skip(engine, options), fields(url = %site_url))]
pub async fn crawl<E: RenderingEngine>(
    site_url: &Url,
    engine: &E,
    options: &CrawlOptions,
) -> Result<Vec<ArticleRecord>, ScrapeError> {
    engine.navigate(site_url).await?;

    let mut state = CrawlState {
        last_height: sample_height(engine).await?,
        seen: HashSet::new(),
        records: Vec::new(),
        cycles: 0,
    };
    let mut spin = progress::spinner();
    debug!(initial_height = state.last_height, "Starting crawl loop");

    loop {
        for _ in 0..options.scrolls_before_check {
            engine.execute_script(SCROLL_TO_BOTTOM).await?;
            sleep(options.scroll_pause).await;
        }

        let html = engine.page_source().await?;
        for record in medium::extract_articles(&html, site_url)? {
            if state.seen.insert(record.dedup_key()) {
                state.records.push(record);
            }
        }
        state.cycles += 1;

        let glyph = spin.next().unwrap_or('|');
        print!("\r{}", progress::render(state.records.len(), glyph));
        let _ = io::stdout().flush();

        let current_height = sample_height(engine).await?;
        if !should_continue(state.last_height, current_height) {
            break;
        }
        state.last_height = current_height;
    }

    info!(
        articles = state.records.len(),
        cycles = state.cycles,
        "Crawl finished"
    );
    Ok(state.records)
}

/// Sample the page's scroll height through the engine.
async fn sample_height<E: RenderingEngine>(engine: &E) -> Result<i64, EngineError> {
    let value = engine.execute_script(SCROLL_HEIGHT).await?;
    value.as_i64().ok_or_else(|| {
        EngineError::Response(format!("scroll height was not an integer: {value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const MARKER_META: &str = r#"<meta name="referrer" content="com.medium.reader">"#;

    fn medium_page(articles: &[(&str, &str)]) -> String {
        let blocks: String = articles
            .iter()
            .map(|(title, link)| {
                format!(r#"<article><h2>{title}</h2><a href="{link}">read</a></article>"#)
            })
            .collect();
        format!("<html><head>{MARKER_META}</head><body>{blocks}</body></html>")
    }

    /// In-memory engine: serves scripted height samples and page snapshots.
    /// Each crawl cycle consumes one snapshot and one height sample; the last
    /// entry of either list repeats once exhausted.
    struct FakeEngine {
        heights: Vec<i64>,
        pages: Vec<String>,
        height_calls: AtomicUsize,
        page_calls: AtomicUsize,
        scrolls: AtomicUsize,
        quit_called: AtomicBool,
        fail_page_source: bool,
    }

    impl FakeEngine {
        fn new(heights: Vec<i64>, pages: Vec<String>) -> Self {
            Self {
                heights,
                pages,
                height_calls: AtomicUsize::new(0),
                page_calls: AtomicUsize::new(0),
                scrolls: AtomicUsize::new(0),
                quit_called: AtomicBool::new(false),
                fail_page_source: false,
            }
        }

        fn scripted<T: Clone>(values: &[T], call: usize) -> T {
            values[call.min(values.len() - 1)].clone()
        }
    }

    impl RenderingEngine for FakeEngine {
        async fn navigate(&self, _url: &Url) -> Result<(), EngineError> {
            Ok(())
        }

        async fn execute_script(&self, script: &str) -> Result<Value, EngineError> {
            if script.starts_with("return") {
                let call = self.height_calls.fetch_add(1, Ordering::SeqCst);
                Ok(Value::from(Self::scripted(&self.heights, call)))
            } else {
                self.scrolls.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }
        }

        async fn page_source(&self) -> Result<String, EngineError> {
            if self.fail_page_source {
                return Err(EngineError::Response("snapshot unavailable".to_string()));
            }
            let call = self.page_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::scripted(&self.pages, call))
        }

        async fn quit(&self) -> Result<(), EngineError> {
            self.quit_called.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn fast_options() -> CrawlOptions {
        CrawlOptions {
            scroll_pause: Duration::from_millis(0),
            scrolls_before_check: 2,
        }
    }

    fn site() -> Url {
        Url::parse("https://rschu.me").unwrap()
    }

    #[test]
    fn test_should_continue_is_false_iff_heights_are_equal() {
        assert!(!should_continue(4000, 4000));
        assert!(!should_continue(0, 0));
        assert!(should_continue(1000, 2000));
        assert!(should_continue(2000, 1000));
    }

    #[tokio::test]
    async fn test_accumulates_across_cycles_without_duplicates() {
        // Cycle 1 re-renders A and B; cycle 2 re-renders both plus C.
        let engine = FakeEngine::new(
            vec![1000, 2000, 2000],
            vec![
                medium_page(&[("Post A", "/posts/a"), ("Post B", "/posts/b")]),
                medium_page(&[
                    ("Post A", "/posts/a"),
                    ("Post B", "/posts/b"),
                    ("Post C", "/posts/c"),
                ]),
            ],
        );

        let records = crawl(&site(), &engine, &fast_options()).await.unwrap();

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Post A", "Post B", "Post C"]);

        let mut keys: Vec<_> = records.iter().map(ArticleRecord::dedup_key).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[tokio::test]
    async fn test_equal_heights_terminate_after_one_cycle() {
        let engine = FakeEngine::new(
            vec![4000, 4000],
            vec![medium_page(&[("Post A", "/posts/a")])],
        );

        let records = crawl(&site(), &engine, &fast_options()).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(engine.page_calls.load(Ordering::SeqCst), 1);
        // Two scroll commands per cycle, one cycle total.
        assert_eq!(engine.scrolls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_marker_aborts_with_platform_error() {
        let engine = FakeEngine::new(
            vec![1000, 2000],
            vec!["<html><head></head><body><article><h2>X</h2></article></body></html>"
                .to_string()],
        );

        let err = crawl(&site(), &engine, &fast_options()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::NotMediumPublication { .. }));

        // Release stays the caller's job on every exit path.
        engine.quit().await.unwrap();
        assert!(engine.quit_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_engine_failures_are_fatal_and_not_retried() {
        let mut engine = FakeEngine::new(vec![1000], vec![medium_page(&[])]);
        engine.fail_page_source = true;

        let err = crawl(&site(), &engine, &fast_options()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Engine(_)));
        assert_eq!(engine.page_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_integer_height_is_an_engine_error() {
        struct NullHeightEngine;
        impl RenderingEngine for NullHeightEngine {
            async fn navigate(&self, _url: &Url) -> Result<(), EngineError> {
                Ok(())
            }
            async fn execute_script(&self, _script: &str) -> Result<Value, EngineError> {
                Ok(Value::Null)
            }
            async fn page_source(&self) -> Result<String, EngineError> {
                Ok(String::new())
            }
            async fn quit(&self) -> Result<(), EngineError> {
                Ok(())
            }
        }

        let err = crawl(&site(), &NullHeightEngine, &fast_options())
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Engine(EngineError::Response(_))));
    }
}
