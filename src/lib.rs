//! # Medium Scroll
//!
//! A scraper that extracts article listings from infinite-scroll Medium
//! publications and exports them to CSV.
//!
//! Medium publication pages render none of their article list up front:
//! content appears only as the page is scrolled, and every scroll step
//! re-renders the full DOM rather than appending to it. The crate therefore
//! solves two problems at its core:
//!
//! 1. **Termination detection**: deciding from successive scroll-height
//!    samples when further scrolling can no longer reveal new content
//!    ([`crawl::should_continue`]).
//! 2. **Re-extraction dedup**: collapsing the same articles extracted from
//!    every re-rendered snapshot into one record each, first occurrence wins,
//!    keyed on `(title, link)` ([`crawl::crawl`]).
//!
//! ## Architecture
//!
//! The crawl loop drives an external rendering engine through the
//! [`engine::RenderingEngine`] capability trait (navigate / execute script /
//! page source / quit), so the core can be exercised against an in-memory
//! fake without a real browser. The production implementation,
//! [`engine::WebDriverEngine`], speaks the W3C WebDriver REST protocol to an
//! already-running driver such as chromedriver.
//!
//! Supporting pieces: a YAML configuration loader ([`config`]), an HTTP
//! audit-log batching client ([`audit`]), and a typed GitHub REST client
//! ([`github`]) with its own `github_stats` binary.

pub mod audit;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod engine;
pub mod error;
pub mod github;
pub mod models;
pub mod outputs;
pub mod progress;
pub mod scrapers;
pub mod utils;

pub use error::{Result, ScrapeError};
pub use models::ArticleRecord;
