//! Browser automation seam.
//!
//! The acquirer only needs launch, open page, navigate, wait for a selector,
//! read the document, and close. Any automation backend that can do those
//! implements these traits; [`crate::HttpLauncher`] is the built-in one.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

/// Starts a fresh browser instance. One instance per acquisition; nothing is
/// pooled or shared across requests.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Browser>, ScraperError>;
}

#[async_trait]
pub trait Browser: Send {
    async fn new_page(&mut self) -> Result<Box<dyn BrowserPage>, ScraperError>;

    /// Release the browser. Called exactly once per launched browser.
    async fn close(&mut self) -> Result<(), ScraperError>;
}

#[async_trait]
pub trait BrowserPage: Send {
    async fn goto(&mut self, url: &str) -> Result<(), ScraperError>;

    /// Block until `selector` matches in the current document or `timeout`
    /// elapses ([`ScraperError::Timeout`]).
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError>;

    /// Serialized HTML of the current document.
    async fn content(&mut self) -> Result<String, ScraperError>;

    /// Release the page. Called exactly once per opened page.
    async fn close(&mut self) -> Result<(), ScraperError>;
}
