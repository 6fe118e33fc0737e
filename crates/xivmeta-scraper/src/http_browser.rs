//! Plain-HTTP browser backend.
//!
//! Fetches documents with `reqwest` instead of driving a real browser. A
//! "wait for selector" re-fetches the current URL on a poll interval until the
//! selector matches, which covers statistics tables that are served late by
//! the origin's cache layer. Pages that build their table purely in client
//! script need a scripting backend behind [`BrowserLauncher`] instead.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use crate::acquire::ScrapeSettings;
use crate::browser::{Browser, BrowserLauncher, BrowserPage};
use crate::error::ScraperError;
use crate::extract::document_has;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpLauncher {
    user_agent: String,
    request_timeout: Duration,
    poll_interval: Duration,
}

impl HttpLauncher {
    /// `poll_interval` is clamped to at least one millisecond.
    #[must_use]
    pub fn new(user_agent: &str, request_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            user_agent: user_agent.to_owned(),
            request_timeout,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &ScrapeSettings) -> Self {
        Self::new(
            &settings.user_agent,
            settings.navigation_timeout,
            settings.poll_interval,
        )
    }
}

#[async_trait]
impl BrowserLauncher for HttpLauncher {
    async fn launch(&self) -> Result<Box<dyn Browser>, ScraperError> {
        let client = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| ScraperError::Launch(e.to_string()))?;
        tracing::debug!("http browser launched");
        Ok(Box::new(HttpBrowser {
            client: Some(client),
            poll_interval: self.poll_interval,
        }))
    }
}

struct HttpBrowser {
    client: Option<Client>,
    poll_interval: Duration,
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_page(&mut self) -> Result<Box<dyn BrowserPage>, ScraperError> {
        let client = self
            .client
            .clone()
            .ok_or_else(|| ScraperError::Page("browser is closed".to_string()))?;
        Ok(Box::new(HttpPage {
            client: Some(client),
            poll_interval: self.poll_interval,
            url: None,
            document: None,
        }))
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        match self.client.take() {
            Some(_) => Ok(()),
            None => Err(ScraperError::Page("browser already closed".to_string())),
        }
    }
}

struct HttpPage {
    client: Option<Client>,
    poll_interval: Duration,
    url: Option<String>,
    document: Option<String>,
}

impl HttpPage {
    fn client(&self) -> Result<&Client, ScraperError> {
        self.client
            .as_ref()
            .ok_or_else(|| ScraperError::Page("page is closed".to_string()))
    }

    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.client()?.get(url).send().await.map_err(|e| {
            ScraperError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl BrowserPage for HttpPage {
    async fn goto(&mut self, url: &str) -> Result<(), ScraperError> {
        let body = self.fetch(url).await?;
        self.url = Some(url.to_owned());
        self.document = Some(body);
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| ScraperError::Page("no document loaded".to_string()))?;
        let deadline = Instant::now() + timeout;
        let timed_out = || ScraperError::Timeout {
            selector: selector.to_owned(),
            waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        };

        loop {
            if let Some(document) = self.document.as_deref() {
                if document_has(document, selector)? {
                    return Ok(());
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out());
            }

            tokio::time::sleep(self.poll_interval.min(remaining)).await;
            tracing::debug!(selector, "selector not present yet, re-fetching");
            // A slow re-fetch must not carry the wait past its deadline.
            let remaining = deadline.saturating_duration_since(Instant::now());
            let body = tokio::time::timeout(remaining, self.fetch(&url))
                .await
                .map_err(|_| timed_out())??;
            self.document = Some(body);
        }
    }

    async fn content(&mut self) -> Result<String, ScraperError> {
        self.document
            .clone()
            .ok_or_else(|| ScraperError::Page("no document loaded".to_string()))
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        self.document = None;
        self.url = None;
        match self.client.take() {
            Some(_) => Ok(()),
            None => Err(ScraperError::Page("page already closed".to_string())),
        }
    }
}
