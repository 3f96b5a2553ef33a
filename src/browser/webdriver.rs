//! WebDriver-backed browser session
//!
//! Connects to a WebDriver server (chromedriver) and exposes the session
//! through the [`BrowserSession`] trait. The browser is configured headless
//! with a fixed viewport and a realistic desktop client identity.

use crate::browser::{BrowserError, BrowserResult, BrowserSession, SessionFactory};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;
use tokio::time::sleep;

/// Interval between presence polls in [`BrowserSession::wait_for_element`]
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Opens WebDriver sessions according to a [`BrowserConfig`]
pub struct WebDriverConnector {
    config: BrowserConfig,
}

impl WebDriverConnector {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for WebDriverConnector {
    async fn open(&self) -> BrowserResult<Box<dyn BrowserSession>> {
        let session = WebDriverSession::connect(&self.config).await?;
        Ok(Box::new(session))
    }
}

/// A live session on a WebDriver server
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Starts a browser session against the configured WebDriver server
    ///
    /// # Arguments
    ///
    /// * `config` - Browser configuration (server address, viewport, identity)
    ///
    /// # Returns
    ///
    /// * `Ok(WebDriverSession)` - Session is live and ready for navigation
    /// * `Err(BrowserError)` - The server was unreachable or rejected the
    ///   requested capabilities
    pub async fn connect(config: &BrowserConfig) -> BrowserResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.add_arg("--headless=new")?;
        }
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg("--disable-gpu")?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            config.window_width, config.window_height
        ))?;
        caps.add_arg(&format!("--user-agent={}", config.user_agent))?;

        let driver = WebDriver::new(&config.webdriver_url, caps)
            .await
            .map_err(|e| BrowserError::SessionStart(e.to_string()))?;

        Ok(Self { driver })
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> BrowserResult<bool> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            match self.driver.find_all(By::Css(selector)).await {
                Ok(elements) if !elements.is_empty() => return Ok(true),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Element poll for '{}' failed: {}", selector, e);
                }
            }
            sleep(POLL_INTERVAL).await;
        }
        Ok(false)
    }

    async fn execute_script(&self, js: &str) -> BrowserResult<serde_json::Value> {
        let ret = self
            .driver
            .execute(js, Vec::new())
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(ret.json().clone())
    }

    async fn query_all(&self, selector: &str) -> BrowserResult<Vec<String>> {
        let elements = self.driver.find_all(By::Css(selector)).await?;
        let mut snapshots = Vec::with_capacity(elements.len());
        for element in elements {
            snapshots.push(element.outer_html().await?);
        }
        Ok(snapshots)
    }

    async fn click(&self, selector: &str) -> BrowserResult<bool> {
        let element = match self.driver.find(By::Css(selector)).await {
            Ok(element) => element,
            Err(_) => return Ok(false),
        };

        // Script-level click: the control may be overlaid by banners or
        // partially outside the viewport, which a native click rejects.
        self.driver
            .execute("arguments[0].click();", vec![element.to_json()?])
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(true)
    }

    async fn quit(self: Box<Self>) -> BrowserResult<()> {
        self.driver.quit().await?;
        Ok(())
    }
}
