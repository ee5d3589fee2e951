//! # Medium Scroll
//!
//! Scrapes article listings from an infinite-scroll Medium publication and
//! exports them to CSV.
//!
//! ## Pipeline
//!
//! 1. **Validate**: syntactic check of the target URL (prompted if absent)
//! 2. **Connect**: open a WebDriver browser session against a running driver
//! 3. **Crawl**: scroll, snapshot, extract, and deduplicate until the page
//!    stops growing
//! 4. **Persist**: write `blog_articles_<host>.csv` into the output directory
//!
//! A URL that fails validation, a page that is not a Medium publication, and
//! a CSV file that cannot be written are all user-facing diagnostics, not
//! process failures: extraction either never started or already succeeded in
//! memory. Only rendering-engine failures exit non-zero.
//!
//! ## Usage
//!
//! ```sh
//! medium_scroll https://rschu.me
//! ```

use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

use medium_scroll::audit::{AuditEvent, AuditLogger};
use medium_scroll::cli::Cli;
use medium_scroll::config::Config;
use medium_scroll::crawl::{self, CrawlOptions};
use medium_scroll::engine::{EngineOptions, RenderingEngine, WebDriverEngine};
use medium_scroll::error::ScrapeError;
use medium_scroll::outputs;
use medium_scroll::utils::is_valid_url;

const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();

    // --- Configuration ---
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // --- Target URL ---
    let raw_url = match args.url.clone() {
        Some(url) => url,
        None => prompt_for_url(&config.scraper.default_blog_url)?,
    };
    let candidate = raw_url.trim().trim_end_matches('/');
    let candidate = if candidate.is_empty() {
        config.scraper.default_blog_url.clone()
    } else {
        candidate.to_string()
    };

    if !is_valid_url(&candidate) {
        println!("{}", ScrapeError::InvalidUrl(candidate));
        return Ok(());
    }
    let blog_url = Url::parse(&candidate)?;

    let mut audit = audit_logger_from(&args, &config);
    if let Some(logger) = audit.as_mut() {
        logger.log_event(
            audit_event("crawl.started", "scrape").with_detail("url", blog_url.as_str()),
        );
    }

    println!("Processing blog articles from: {blog_url}");

    // --- Rendering engine session ---
    let webdriver_url = args
        .webdriver_url
        .clone()
        .unwrap_or_else(|| config.engine.webdriver_url.clone());
    let engine_options = EngineOptions {
        headless: config.engine.headless,
        window_size: config.engine.window_size.clone(),
        user_agent: config.engine.user_agent.clone(),
    };
    let engine = match WebDriverEngine::connect(&webdriver_url, &engine_options).await {
        Ok(engine) => engine,
        Err(e) => {
            error!(endpoint = %webdriver_url, error = %e, "Could not open a rendering engine session");
            if let Some(logger) = audit.as_mut() {
                logger.log_event(
                    audit_event("crawl.failed", "connect").with_detail("url", blog_url.as_str()),
                );
            }
            flush_audit(&mut audit).await;
            return Err(e.into());
        }
    };

    // --- Crawl ---
    let crawl_options = CrawlOptions {
        scroll_pause: Duration::from_secs(config.scraper.scroll_pause_secs),
        scrolls_before_check: config.scraper.scrolls_before_check,
    };
    let crawl_result = crawl::crawl(&blog_url, &engine, &crawl_options).await;

    // The browser session is released whatever the crawl produced.
    if let Err(e) = engine.quit().await {
        warn!(error = %e, "Failed to close the rendering engine session");
    }

    let records = match crawl_result {
        Ok(records) => records,
        Err(e @ ScrapeError::NotMediumPublication { .. }) => {
            println!("\r{e}");
            if let Some(logger) = audit.as_mut() {
                logger.log_event(
                    audit_event("crawl.failed", "platform-check")
                        .with_detail("url", blog_url.as_str()),
                );
            }
            flush_audit(&mut audit).await;
            return Ok(());
        }
        Err(e) => {
            error!(error = %e, "Crawl aborted");
            if let Some(logger) = audit.as_mut() {
                logger.log_event(
                    audit_event("crawl.failed", "scrape").with_detail("url", blog_url.as_str()),
                );
            }
            flush_audit(&mut audit).await;
            return Err(e.into());
        }
    };

    // --- Results ---
    let result_text = format!("{} Articles found", records.len());
    let separator = "-".repeat(result_text.len());
    println!("\n\n{separator}");
    println!("{result_text}");
    println!("{separator}");

    if let Some(first) = records.first() {
        println!("\nExample:");
        println!("Title:  {}", first.title);
        println!("Link:  {}", first.link);
        println!("Published at:  {}", first.published);
    }

    if !records.is_empty() {
        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.scraper.output_dir.clone());
        match outputs::csv::write_records(&records, &blog_url, &output_dir).await {
            Ok(path) => {
                println!("\nCSV file created: {}", path.display());
                if let Some(logger) = audit.as_mut() {
                    logger.log_event(
                        audit_event("output.csv.completed", "persist")
                            .with_detail("path", path.display().to_string()),
                    );
                }
            }
            Err(e) => {
                // The records are already extracted; show them instead of
                // failing the run.
                error!(error = %e, "Could not persist the result file");
                println!("\nExtracted data (not persisted):");
                println!("{}", serde_json::to_string_pretty(&records)?);
                if let Some(logger) = audit.as_mut() {
                    logger.log_event(audit_event("output.csv.failed", "persist"));
                }
            }
        }
    }

    info!(articles = records.len(), url = %blog_url, "Execution complete");
    if let Some(logger) = audit.as_mut() {
        logger.log_event(
            audit_event("crawl.completed", "scrape")
                .with_detail("url", blog_url.as_str())
                .with_detail("articles", records.len()),
        );
    }
    flush_audit(&mut audit).await;

    Ok(())
}

/// Ask for a publication URL on stdin, offering `default_url` on empty input.
fn prompt_for_url(default_url: &str) -> io::Result<String> {
    print!("Enter the Medium blog URL (e.g., {default_url}): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Build the audit logger when an endpoint is configured; audit setup
/// problems are warnings, never fatal.
fn audit_logger_from(args: &Cli, config: &Config) -> Option<AuditLogger> {
    let (api_url, api_key) = match (&args.audit_api_url, &config.audit) {
        (Some(url), audit_config) => (
            url.clone(),
            args.audit_api_key
                .clone()
                .or_else(|| audit_config.as_ref().and_then(|c| c.api_key.clone())),
        ),
        (None, Some(audit_config)) => (audit_config.api_url.clone(), audit_config.api_key.clone()),
        (None, None) => return None,
    };

    match AuditLogger::new(api_url, api_key.as_deref()) {
        Ok(logger) => Some(logger),
        Err(e) => {
            warn!(error = %e, "Failed to initialize audit logging; continuing without it");
            None
        }
    }
}

/// Standard scraper audit record.
fn audit_event(event_name: &str, action: &str) -> AuditEvent {
    AuditEvent::new(event_name, APP_NAME, "scraper", action)
}

/// Ship any collected audit events; failures are logged and dropped.
async fn flush_audit(audit: &mut Option<AuditLogger>) {
    if let Some(logger) = audit {
        if let Err(e) = logger.send_batch().await {
            warn!(error = %e, pending = logger.pending(), "Failed to ship audit events");
        }
    }
}
