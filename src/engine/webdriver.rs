//! WebDriver-protocol implementation of [`RenderingEngine`].
//!
//! Speaks the plain W3C WebDriver REST endpoints with `reqwest`, so any
//! compliant driver works (chromedriver, geckodriver, a Selenium grid). The
//! driver process itself is not managed here; [`WebDriverEngine::connect`]
//! expects the endpoint to be listening already.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info, instrument};
use url::Url;

use super::{EngineError, RenderingEngine};
use crate::utils::random_user_agent;

/// Per-request timeout. Navigation against a heavy page is the slow case.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Browser session options, typically taken from the `[engine]` config table.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Viewport size passed to the browser, `WIDTHxHEIGHT`.
    pub window_size: String,
    /// Browser identity; a pool entry is picked when unset.
    pub user_agent: Option<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: "1920x1080".to_string(),
            user_agent: None,
        }
    }
}

/// A live WebDriver browser session.
pub struct WebDriverEngine {
    client: reqwest::Client,
    base: String,
    session_id: String,
}

impl WebDriverEngine {
    /// Open a new browser session against the driver at `endpoint`.
    #[instrument(level = "info", skip(options))]
    pub async fn connect(endpoint: &str, options: &EngineOptions) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base = endpoint.trim_end_matches('/').to_string();

        let response = client
            .post(format!("{base}/session"))
            .json(&capabilities(options))
            .send()
            .await?;
        let value = interpret_response(response).await?;

        let session_id = value
            .pointer("/value/sessionId")
            .or_else(|| value.pointer("/sessionId"))
            .and_then(Value::as_str)
            .ok_or_else(|| EngineError::Response("session id missing from response".to_string()))?
            .to_string();

        info!(%session_id, endpoint = %base, "WebDriver session created");
        Ok(Self {
            client,
            base,
            session_id,
        })
    }

    fn session_url(&self, tail: &str) -> String {
        format!("{}/session/{}{tail}", self.base, self.session_id)
    }
}

impl RenderingEngine for WebDriverEngine {
    async fn navigate(&self, url: &Url) -> Result<(), EngineError> {
        debug!(%url, "Navigating");
        let response = self
            .client
            .post(self.session_url("/url"))
            .json(&json!({ "url": url.as_str() }))
            .send()
            .await?;
        interpret_response(response).await?;
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<Value, EngineError> {
        let response = self
            .client
            .post(self.session_url("/execute/sync"))
            .json(&json!({ "script": script, "args": [] }))
            .send()
            .await?;
        let value = interpret_response(response).await?;
        Ok(value.pointer("/value").cloned().unwrap_or(Value::Null))
    }

    async fn page_source(&self) -> Result<String, EngineError> {
        let response = self
            .client
            .get(self.session_url("/source"))
            .send()
            .await?;
        let value = interpret_response(response).await?;
        value
            .pointer("/value")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| EngineError::Response("page source missing from response".to_string()))
    }

    async fn quit(&self) -> Result<(), EngineError> {
        debug!(session_id = %self.session_id, "Deleting WebDriver session");
        let response = self
            .client
            .delete(self.session_url(""))
            .send()
            .await?;
        interpret_response(response).await?;
        Ok(())
    }
}

/// Build W3C capabilities for a Chrome-family browser from session options.
fn capabilities(options: &EngineOptions) -> Value {
    let user_agent = options
        .user_agent
        .clone()
        .unwrap_or_else(|| random_user_agent().to_string());
    let mut args = vec![
        format!("window-size={}", options.window_size),
        "--disable-blink-features=AutomationControlled".to_string(),
        format!("user-agent={user_agent}"),
    ];
    if options.headless {
        args.insert(0, "--headless".to_string());
    }
    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "goog:chromeOptions": {
                    "args": args,
                    "excludeSwitches": ["enable-automation"],
                    "useAutomationExtension": false,
                }
            }
        }
    })
}

/// Decode a WebDriver HTTP response, surfacing HTTP-level and protocol-level
/// failures as [`EngineError`].
async fn interpret_response(response: reqwest::Response) -> Result<Value, EngineError> {
    let status = response.status();
    let body = response.text().await?;
    let value: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    if let Some(name) = value.pointer("/value/error").and_then(Value::as_str) {
        let message = value
            .pointer("/value/message")
            .and_then(Value::as_str)
            .unwrap_or("unknown webdriver error");
        return Err(EngineError::Protocol {
            name: name.to_string(),
            message: message.to_string(),
        });
    }
    if !status.is_success() {
        return Err(EngineError::Response(format!(
            "HTTP {}: {}",
            status.as_u16(),
            body.chars().take(200).collect::<String>()
        )));
    }
    Ok(value)
}
