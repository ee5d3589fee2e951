//! Rendering engine abstraction.
//!
//! The crawl loop never talks to a browser directly; it drives anything that
//! implements [`RenderingEngine`]. The production implementation is
//! [`WebDriverEngine`], which speaks the W3C WebDriver REST protocol to an
//! already-running driver (e.g. chromedriver). Tests substitute an in-memory
//! fake, so the crawl core runs without a browser.
//!
//! Driver lifecycle is out of scope here: the engine connects to an endpoint
//! that must already be listening, and releases only its own session.

use serde_json::Value;
use thiserror::Error;
use url::Url;

mod webdriver;

pub use webdriver::{EngineOptions, WebDriverEngine};

/// Failures while communicating with the rendering engine. All of them are
/// fatal to a crawl; none are retried.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The HTTP transport to the engine failed outright.
    #[error("engine transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The engine answered with a WebDriver-level error payload.
    #[error("webdriver error '{name}': {message}")]
    Protocol { name: String, message: String },

    /// The engine answered with something the client could not interpret.
    #[error("unexpected engine response: {0}")]
    Response(String),
}

/// Capability interface onto a live rendering engine session.
///
/// Exactly the four operations the crawl loop needs: load a page, run a
/// script in it, snapshot the rendered markup, and close the session.
/// Any engine satisfying this contract is substitutable.
pub trait RenderingEngine {
    /// Load `url` in the engine and wait for the initial render.
    async fn navigate(&self, url: &Url) -> Result<(), EngineError>;

    /// Execute a synchronous script in the current page and return its value.
    async fn execute_script(&self, script: &str) -> Result<Value, EngineError>;

    /// Return the serialized markup of the current rendered page.
    async fn page_source(&self) -> Result<String, EngineError>;

    /// Close the engine session. Further calls on the engine are invalid.
    async fn quit(&self) -> Result<(), EngineError>;
}
