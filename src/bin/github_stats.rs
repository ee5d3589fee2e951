//! GitHub statistics collector.
//!
//! Fetches a selection of metrics (profile, rate limits, repository traffic)
//! through the typed GitHub client and prints them as one JSON document,
//! traffic metrics nested under `"traffic"`.
//!
//! Arguments missing from the command line (and from the optional config
//! file) are prompted for interactively, so the binary works both scripted
//! and by hand.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use serde_json::{json, Map, Value};
use tracing::info;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use medium_scroll::config::Config;
use medium_scroll::github::{GitHubClient, Metric};

/// Command-line arguments for the GitHub statistics collector.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// GitHub username
    #[arg(short, long)]
    username: Option<String>,

    /// GitHub repository name
    #[arg(short, long)]
    repository: Option<String>,

    /// GitHub API token
    #[arg(short, long, env = "GITHUB_TOKEN")]
    token: Option<String>,

    /// Comma-separated metrics to fetch; all of them when omitted
    #[arg(short, long, value_delimiter = ',')]
    metrics: Vec<Metric>,

    /// Path to a YAML config file with a `github` section
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    let github_config = match &args.config {
        Some(path) => Config::load(path)?.github,
        None => None,
    };

    let username = resolve(
        args.username,
        github_config.as_ref().map(|c| c.username.clone()),
        "Enter your GitHub username: ",
    )?;
    let repository = resolve(
        args.repository,
        github_config.as_ref().map(|c| c.repository.clone()),
        "Enter your GitHub repository name: ",
    )?;
    let token = match args.token.or(github_config.and_then(|c| c.token)) {
        Some(token) => Some(token),
        None => {
            let entered = prompt("Enter your GitHub API token (blank for none): ")?;
            (!entered.is_empty()).then_some(entered)
        }
    };

    let metrics: Vec<Metric> = if args.metrics.is_empty() {
        Metric::ALL.to_vec()
    } else {
        args.metrics
    };
    info!(?metrics, %username, %repository, "Collecting GitHub statistics");

    let client = GitHubClient::new(&username, &repository, token.as_deref())?;

    let mut report = Map::new();
    let mut traffic = Map::new();
    for metric in metrics {
        let value = fetch_metric(&client, metric).await?;
        if metric.is_traffic() {
            traffic.insert(metric.label().to_string(), value);
        } else {
            report.insert(metric.label().to_string(), value);
        }
    }
    if !traffic.is_empty() {
        report.insert("traffic".to_string(), Value::Object(traffic));
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(report))?);
    Ok(())
}

/// Fetch one metric and erase its type into JSON for the report.
async fn fetch_metric(client: &GitHubClient, metric: Metric) -> Result<Value, Box<dyn Error>> {
    let value = match metric {
        Metric::RateLimit => json!(client.rate_limit().await?),
        Metric::UserInfo => json!(client.user_info().await?),
        Metric::TrafficViews => json!(client.traffic_views().await?),
        Metric::TrafficClones => json!(client.traffic_clones().await?),
        Metric::TrafficPopularPaths => json!(client.popular_paths().await?),
        Metric::TrafficPopularReferrers => json!(client.popular_referrers().await?),
    };
    Ok(value)
}

/// First of: command-line value, config value, interactive answer.
fn resolve(
    from_args: Option<String>,
    from_config: Option<String>,
    prompt_text: &str,
) -> io::Result<String> {
    match from_args.or(from_config) {
        Some(value) => Ok(value),
        None => prompt(prompt_text),
    }
}

/// Ask one question on stdin and return the trimmed answer.
fn prompt(text: &str) -> io::Result<String> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
