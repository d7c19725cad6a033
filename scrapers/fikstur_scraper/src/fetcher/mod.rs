//! Rendered-page acquisition.
//!
//! [`HtmlFetcher`] is the seam the rest of the crate depends on.
//! [`BrowserFetcher`] implements it on top of any [`BrowserLauncher`], one
//! browser per call, and always closes the browser it launched.

pub mod chromium;

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::{config::BrowserSettings, error::FetchError};
pub use chromium::ChromiumLauncher;

#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

/// What a session needs to know to load a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOptions {
    pub user_agent: String,
    /// Pause after load so client-side rendering can finish.
    pub settle_delay: Duration,
}

/// Starts a fresh headless browser.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, FetchError>;
}

/// A running browser owned by a single fetch.
#[async_trait]
pub trait BrowserSession: Send {
    async fn render(&mut self, url: &str, options: &NavigationOptions) -> Result<String, FetchError>;
    async fn close(self: Box<Self>) -> Result<(), FetchError>;
}

pub struct BrowserFetcher<L> {
    launcher: L,
    options: NavigationOptions,
    timeout: Duration,
}

impl<L: BrowserLauncher> BrowserFetcher<L> {
    pub fn new(launcher: L, settings: &BrowserSettings) -> Self {
        let settle_delay = Duration::from_millis(settings.settle_delay_ms);
        Self {
            launcher,
            options: NavigationOptions {
                user_agent: settings.user_agent.clone(),
                settle_delay,
            },
            timeout: Duration::from_secs(settings.navigation_timeout_secs) + settle_delay,
        }
    }

    /// Overrides the render budget (navigation plus settle delay).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl BrowserFetcher<ChromiumLauncher> {
    pub fn chromium(settings: &BrowserSettings) -> Self {
        Self::new(ChromiumLauncher::new(settings), settings)
    }
}

#[async_trait]
impl<L: BrowserLauncher> HtmlFetcher for BrowserFetcher<L> {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        info!("Launching browser...");
        let mut session = self.launcher.launch().await?;

        info!("Loading page {}", url);
        let rendered = tokio::time::timeout(self.timeout, session.render(url, &self.options)).await;
        let rendered = match rendered {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }),
        };

        if let Err(e) = session.close().await {
            warn!("Browser did not shut down cleanly: {}", e);
        }

        let html = rendered?;
        info!("Fetched {} bytes of rendered HTML", html.len());
        Ok(html)
    }
}
