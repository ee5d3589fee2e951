//! HTTP audit-log batching client.
//!
//! Crawl runs can report lifecycle events (`crawl.started`,
//! `crawl.completed`, `output.csv.failed`, ...) to an external audit-log
//! service. Events are collected locally and shipped in one bulk request to
//! `POST {api_url}/create-bulk`; on a failed send the collected entries are
//! kept so a later flush can retry them.
//!
//! The logger is an explicit instance owned by the caller, never a process
//! global, and audit failures are reported as values: the scraper treats
//! them as warnings, not fatal conditions.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

/// Audit client failures.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The bulk request could not be sent at all.
    #[error("audit request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("audit API rejected the batch with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// One audit-log record.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event_name: String,
    pub application_name: String,
    pub module: String,
    pub action: String,
    /// RFC 3339 UTC timestamp taken when the event was built.
    pub recorded_at: String,
    /// Free-form additional fields, serialized inline with the record.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl AuditEvent {
    /// Build a standard audit record stamped with the current time.
    pub fn new(
        event_name: impl Into<String>,
        application_name: impl Into<String>,
        module: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            application_name: application_name.into(),
            module: module.into(),
            action: action.into(),
            recorded_at: Utc::now().to_rfc3339(),
            details: Map::new(),
        }
    }

    /// Attach an additional field to the record.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Batching client for the audit-log API.
pub struct AuditLogger {
    api_url: String,
    client: reqwest::Client,
    entries: Vec<AuditEvent>,
}

impl AuditLogger {
    /// Create a client for the service at `api_url`. The API key, when
    /// given, is sent as an `x-api-key` header on every request.
    pub fn new(api_url: impl Into<String>, api_key: Option<&str>) -> Result<Self, AuditError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(key) = api_key {
            if let Ok(value) = reqwest::header::HeaderValue::from_str(key) {
                headers.insert("x-api-key", value);
            }
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client,
            entries: Vec::new(),
        })
    }

    /// Number of events collected and not yet shipped.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Add an event to the collection without sending it.
    pub fn log_event(&mut self, event: AuditEvent) {
        debug!(event_name = %event.event_name, "Collected audit event");
        self.entries.push(event);
    }

    /// Add an event and immediately ship the whole collection.
    pub async fn log_and_send(&mut self, event: AuditEvent) -> Result<Option<Value>, AuditError> {
        self.log_event(event);
        self.send_batch().await
    }

    /// Ship all collected events in one bulk request.
    ///
    /// Returns the service's response body, or `None` when there was nothing
    /// to send. The collection is cleared only after a successful send;
    /// failed batches stay queued.
    pub async fn send_batch(&mut self) -> Result<Option<Value>, AuditError> {
        if self.entries.is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .post(format!("{}/create-bulk", self.api_url))
            .json(&self.entries)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let sent = self.entries.len();
        self.entries.clear();
        info!(count = sent, "Shipped audit event batch");
        Ok(Some(response.json().await.unwrap_or(Value::Null)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn event(name: &str) -> AuditEvent {
        AuditEvent::new(name, "medium_scroll", "crawl", "scrape")
    }

    #[test]
    fn test_events_serialize_details_inline() {
        let event = event("crawl.completed").with_detail("articles", 42);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_name"], "crawl.completed");
        assert_eq!(json["articles"], 42);
        assert!(json["recorded_at"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_send_batch_ships_and_clears_the_collection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-bulk"))
            .and(header("x-api-key", "secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "created": 2 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut logger = AuditLogger::new(server.uri(), Some("secret")).unwrap();
        logger.log_event(event("crawl.started"));
        logger.log_event(event("crawl.completed"));
        assert_eq!(logger.pending(), 2);

        let response = logger.send_batch().await.unwrap();
        assert_eq!(response.unwrap()["created"], 2);
        assert_eq!(logger.pending(), 0);
    }

    #[tokio::test]
    async fn test_log_and_send_ships_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-bulk"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "created": 1 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut logger = AuditLogger::new(server.uri(), None).unwrap();
        let response = logger.log_and_send(event("crawl.failed")).await.unwrap();
        assert!(response.is_some());
        assert_eq!(logger.pending(), 0);
    }

    #[tokio::test]
    async fn test_empty_batches_are_not_sent() {
        let mut logger = AuditLogger::new("http://127.0.0.1:1", None).unwrap();
        assert!(logger.send_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_batches_stay_queued() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-bulk"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let mut logger = AuditLogger::new(server.uri(), None).unwrap();
        logger.log_event(event("crawl.started"));

        let err = logger.send_batch().await.unwrap_err();
        assert!(matches!(err, AuditError::Rejected { status: 500, .. }));
        assert_eq!(logger.pending(), 1);
    }
}
