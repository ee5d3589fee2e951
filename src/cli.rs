//! Command-line interface for the scraper binary.
//!
//! Everything is optional: the target URL falls back to an interactive
//! prompt, and the remaining flags override their `config.yaml`
//! counterparts.

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for the Medium Scroll scraper.
///
/// # Examples
///
/// ```sh
/// # Prompt for the publication URL, write CSV into the working directory
/// medium_scroll
///
/// # Everything on the command line
/// medium_scroll https://rschu.me -o ./exports --webdriver-url http://127.0.0.1:9515
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Publication URL to crawl (prompted for when omitted)
    pub url: Option<String>,

    /// Path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory the CSV result file is written into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// WebDriver endpoint of an already-running driver
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Audit-log API base URL (enables audit events when set)
    #[arg(long, env = "AUDIT_API_URL")]
    pub audit_api_url: Option<String>,

    /// Audit-log API key, sent as x-api-key
    #[arg(long, env = "AUDIT_API_KEY")]
    pub audit_api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation() {
        let cli = Cli::parse_from(["medium_scroll"]);
        assert!(cli.url.is_none());
        assert!(cli.config.is_none());
        assert!(cli.output_dir.is_none());
    }

    #[test]
    fn test_positional_url_and_flags() {
        let cli = Cli::parse_from([
            "medium_scroll",
            "https://rschu.me",
            "-o",
            "./exports",
            "--webdriver-url",
            "http://127.0.0.1:4444",
        ]);

        assert_eq!(cli.url.as_deref(), Some("https://rschu.me"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("./exports")));
        assert_eq!(cli.webdriver_url.as_deref(), Some("http://127.0.0.1:4444"));
    }

    #[test]
    fn test_config_short_flag() {
        let cli = Cli::parse_from(["medium_scroll", "-c", "/etc/medium_scroll.yaml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/medium_scroll.yaml")));
    }
}
