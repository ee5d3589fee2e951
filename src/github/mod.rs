//! GitHub REST API client.
//!
//! A thin typed wrapper over the endpoints the `github_stats` binary reports
//! on: user profile, rate limits, and repository traffic. Responses map
//! straight into the structs in [`models`]; there is no caching and no
//! pagination, these endpoints return complete documents.
//!
//! The client is an explicit instance holding its own `reqwest::Client`;
//! credentials live in the instance, never in process globals.

pub mod models;

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use models::{
    GitHubUser, PopularPath, PopularReferrer, RateLimit, TrafficClones, TrafficViews,
};

/// Public GitHub REST endpoint.
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// GitHub client failures.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport failure or undecodable response body.
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The token could not be used as an HTTP header value.
    #[error("GitHub token is not a valid header value")]
    InvalidToken,
}

/// Metrics the stats binary can fetch, selectable as a comma-separated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    RateLimit,
    UserInfo,
    TrafficViews,
    TrafficClones,
    TrafficPopularPaths,
    TrafficPopularReferrers,
}

impl Metric {
    /// Every metric, in report order.
    pub const ALL: [Metric; 6] = [
        Metric::RateLimit,
        Metric::UserInfo,
        Metric::TrafficViews,
        Metric::TrafficClones,
        Metric::TrafficPopularPaths,
        Metric::TrafficPopularReferrers,
    ];

    /// Key under which this metric appears in the JSON report.
    pub fn label(self) -> &'static str {
        match self {
            Metric::RateLimit => "rate_limit",
            Metric::UserInfo => "user_info",
            Metric::TrafficViews => "views",
            Metric::TrafficClones => "clones",
            Metric::TrafficPopularPaths => "popular_paths",
            Metric::TrafficPopularReferrers => "popular_referrers",
        }
    }

    /// Traffic metrics are nested under a `"traffic"` object in the report.
    pub fn is_traffic(self) -> bool {
        matches!(
            self,
            Metric::TrafficViews
                | Metric::TrafficClones
                | Metric::TrafficPopularPaths
                | Metric::TrafficPopularReferrers
        )
    }
}

/// Typed GitHub REST API client bound to one user/repository pair.
pub struct GitHubClient {
    base_url: String,
    username: String,
    repository: String,
    client: reqwest::Client,
}

impl GitHubClient {
    /// Build a client. The token, when given, is sent as a `token` auth
    /// header on every request; without it only public data is reachable.
    pub fn new(
        username: impl Into<String>,
        repository: impl Into<String>,
        token: Option<&str>,
    ) -> Result<Self, GitHubError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "medium_scroll/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        if let Some(token) = token {
            let value = reqwest::header::HeaderValue::from_str(&format!("token {token}"))
                .map_err(|_| GitHubError::InvalidToken)?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: username.into(),
            repository: repository.into(),
            client,
        })
    }

    /// Point the client at a different API root. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Run one GET request, repo-scoped or root-scoped, and decode the body.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        repo_scoped: bool,
    ) -> Result<T, GitHubError> {
        let url = if repo_scoped {
            format!(
                "{}/repos/{}/{}/{path}",
                self.base_url, self.username, self.repository
            )
        } else {
            format!("{}/{path}", self.base_url)
        };
        debug!(%url, "GitHub API request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// `GET /user`: the authenticated user's profile.
    pub async fn user_info(&self) -> Result<GitHubUser, GitHubError> {
        self.get("user", false).await
    }

    /// `GET /rate_limit`: current limits for every resource.
    pub async fn rate_limit(&self) -> Result<RateLimit, GitHubError> {
        self.get("rate_limit", false).await
    }

    /// `GET .../traffic/views`: view counts for the repository.
    pub async fn traffic_views(&self) -> Result<TrafficViews, GitHubError> {
        self.get("traffic/views", true).await
    }

    /// `GET .../traffic/clones`: clone counts for the repository.
    pub async fn traffic_clones(&self) -> Result<TrafficClones, GitHubError> {
        self.get("traffic/clones", true).await
    }

    /// `GET .../traffic/popular/paths`: most-visited content paths.
    pub async fn popular_paths(&self) -> Result<Vec<PopularPath>, GitHubError> {
        self.get("traffic/popular/paths", true).await
    }

    /// `GET .../traffic/popular/referrers`: top referring domains.
    pub async fn popular_referrers(&self) -> Result<Vec<PopularReferrer>, GitHubError> {
        self.get("traffic/popular/referrers", true).await
    }
}
