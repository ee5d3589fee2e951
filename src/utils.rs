//! Small helpers shared by the scraper binary: URL validation and the
//! user-agent pool the rendering engine identifies itself with.

use once_cell::sync::Lazy;
use rand::{rng, Rng};
use regex::Regex;
use url::Url;

/// Acceptance pattern for crawlable site URLs: `http(s)`/`ftp(s)` scheme,
/// dot-separated host labels with a 2+ character top label, optional
/// trailing path or query.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:http|ftp)s?://(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)(?:/?|[/?]\S+)$",
    )
    .unwrap()
});

/// Desktop browser identities offered to the target site. One is picked at
/// random per session, standing in for a live user-agent database.
const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Syntactic acceptance test for a candidate site URL.
///
/// Accepts only absolute URLs with an `http`, `https`, `ftp`, or `ftps`
/// scheme and a well-formed dotted host. Malformed input returns `false`;
/// this function never errors.
pub fn is_valid_url(candidate: &str) -> bool {
    let Ok(parsed) = Url::parse(candidate) else {
        return false;
    };
    if parsed.host_str().is_none_or(str::is_empty) {
        return false;
    }
    URL_PATTERN.is_match(candidate)
}

/// Pick a browser identity from the pool.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS[rng().random_range(0..USER_AGENTS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_https_and_ftp_schemes() {
        assert!(is_valid_url("https://rschu.me"));
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("ftp://files.example.com"));
        assert!(is_valid_url("ftps://files.example.com"));
    }

    #[test]
    fn test_accepts_paths_and_queries() {
        assert!(is_valid_url("https://blog.example.com/articles?page=2"));
        assert!(is_valid_url("https://sub.domain.co.uk/a/b/c"));
        assert!(is_valid_url("https://example.com/"));
    }

    #[test]
    fn test_rejects_missing_scheme() {
        assert!(!is_valid_url("rschu.me"));
        assert!(!is_valid_url("www.example.com/blog"));
    }

    #[test]
    fn test_rejects_missing_or_malformed_host() {
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("http://nodots"));
        assert!(!is_valid_url("file:///etc/passwd"));
        assert!(!is_valid_url("not a url at all"));
    }

    #[test]
    fn test_rejects_unsupported_schemes() {
        assert!(!is_valid_url("ws://example.com"));
        assert!(!is_valid_url("mailto:user@example.com"));
    }

    #[test]
    fn test_random_user_agent_comes_from_the_pool() {
        for _ in 0..16 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }
}
