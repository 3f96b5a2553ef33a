//! Browser automation capability for Etalase
//!
//! The traversal engine never talks to a browser directly; it depends on the
//! [`BrowserSession`] trait, which names exactly the actions the engine
//! requires performed. The production implementation drives a WebDriver
//! server ([`webdriver::WebDriverConnector`]); tests substitute a scripted
//! session serving canned DOM snapshots.

pub mod webdriver;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use webdriver::{WebDriverConnector, WebDriverSession};

/// Errors that can occur while driving a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to start browser session: {0}")]
    SessionStart(String),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("Script execution failed: {0}")]
    Script(String),
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// One live browser automation session, owned by a single traversal run
///
/// All methods take CSS selectors. Implementations must be safe to call
/// sequentially from one task; the engine never interleaves commands.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigates the session to the given URL
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// Waits up to `timeout` for at least one element matching `selector`
    /// to be present. Returns `false` on timeout; timeouts are an
    /// expected outcome, not an error.
    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> BrowserResult<bool>;

    /// Executes a JavaScript snippet and returns its JSON result
    async fn execute_script(&self, js: &str) -> BrowserResult<serde_json::Value>;

    /// Returns rendered outer-HTML snapshots of every element matching
    /// `selector`, in document order
    async fn query_all(&self, selector: &str) -> BrowserResult<Vec<String>>;

    /// Clicks the first element matching `selector` via a script-level
    /// click, bypassing hit-testing (the control may be partially
    /// obscured). Returns `false` if no such element exists.
    async fn click(&self, selector: &str) -> BrowserResult<bool>;

    /// Releases the session. Must be called exactly once per session.
    async fn quit(self: Box<Self>) -> BrowserResult<()>;
}

/// Produces one browser session per traversal run
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Opens a fresh session. Called once at the start of each run.
    async fn open(&self) -> BrowserResult<Box<dyn BrowserSession>>;
}
