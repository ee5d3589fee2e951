//! Data-transfer structs for the GitHub REST API.
//!
//! Field names mirror the wire format, so everything maps with plain serde
//! derives. GitHub adds fields over time; unknown keys are deliberately
//! ignored rather than rejected.

use serde::{Deserialize, Serialize};

/// Subset of `GET /user` the stats output cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    pub node_id: String,
    pub avatar_url: String,
    pub html_url: String,
    /// Account type, `User` or `Organization`.
    #[serde(rename = "type")]
    pub account_type: String,
    pub site_admin: bool,
    pub name: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub twitter_username: Option<String>,
    pub public_repos: u64,
    pub public_gists: u64,
    pub followers: u64,
    pub following: u64,
    pub created_at: String,
    pub updated_at: String,
}

/// One rate-limited resource bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitItem {
    /// Requests permitted per window.
    pub limit: u64,
    /// Requests already spent in the current window.
    pub used: u64,
    /// Requests left before the limit bites.
    pub remaining: u64,
    /// Window reset time, UTC epoch seconds.
    pub reset: u64,
}

/// Per-resource rate limits from `GET /rate_limit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitItem,
    pub search: RateLimitItem,
    pub graphql: Option<RateLimitItem>,
}

/// Response of `GET /rate_limit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimit {
    pub resources: RateLimitResources,
    /// Global rate limit stats.
    pub rate: RateLimitItem,
}

/// One day/week bucket in a traffic series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficBucket {
    pub timestamp: String,
    pub count: u64,
    pub uniques: u64,
}

/// Response of `GET /repos/{owner}/{repo}/traffic/views`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficViews {
    pub count: u64,
    pub uniques: u64,
    pub views: Vec<TrafficBucket>,
}

/// Response of `GET /repos/{owner}/{repo}/traffic/clones`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficClones {
    pub count: u64,
    pub uniques: u64,
    pub clones: Vec<TrafficBucket>,
}

/// One entry of `GET /repos/{owner}/{repo}/traffic/popular/paths`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularPath {
    /// URL path of the popular content.
    pub path: String,
    /// Title of the page at that path.
    pub title: String,
    pub count: u64,
    pub uniques: u64,
}

/// One entry of `GET /repos/{owner}/{repo}/traffic/popular/referrers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularReferrer {
    /// Domain users reached the repository from.
    pub referrer: String,
    pub count: u64,
    pub uniques: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_maps_the_type_field_and_nullables() {
        let json = r#"{
            "login": "octocat", "id": 1, "node_id": "MDQ6VXNlcjE=",
            "avatar_url": "https://avatars.example.com/u/1",
            "html_url": "https://github.com/octocat",
            "type": "User", "site_admin": false,
            "name": "The Octocat", "company": null, "blog": "",
            "location": "San Francisco", "email": null, "bio": null,
            "twitter_username": null,
            "public_repos": 8, "public_gists": 8,
            "followers": 9999, "following": 9,
            "created_at": "2011-01-25T18:44:36Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "gravatar_id": ""
        }"#;

        let user: GitHubUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.account_type, "User");
        assert_eq!(user.company, None);
        assert_eq!(user.followers, 9999);
    }

    #[test]
    fn test_rate_limit_tolerates_extra_resource_buckets() {
        let json = r#"{
            "resources": {
                "core": {"limit": 5000, "used": 1, "remaining": 4999, "reset": 1691591363},
                "search": {"limit": 30, "used": 0, "remaining": 30, "reset": 1691591363},
                "graphql": {"limit": 5000, "used": 0, "remaining": 5000, "reset": 1691591363},
                "integration_manifest": {"limit": 5000, "used": 0, "remaining": 5000, "reset": 1691591363}
            },
            "rate": {"limit": 5000, "used": 1, "remaining": 4999, "reset": 1691591363}
        }"#;

        let limits: RateLimit = serde_json::from_str(json).unwrap();
        assert_eq!(limits.rate.remaining, 4999);
        assert_eq!(limits.resources.search.limit, 30);
    }

    #[test]
    fn test_traffic_views_round_trip() {
        let views = TrafficViews {
            count: 14,
            uniques: 7,
            views: vec![TrafficBucket {
                timestamp: "2024-01-01T00:00:00Z".to_string(),
                count: 14,
                uniques: 7,
            }],
        };

        let json = serde_json::to_string(&views).unwrap();
        let restored: TrafficViews = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.views.len(), 1);
        assert_eq!(restored.views[0].uniques, 7);
    }
}
