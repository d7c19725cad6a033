//! Headless Chromium sessions via chromiumoxide.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::{Stream, StreamExt};
use std::{fmt::Display, path::PathBuf, time::Duration};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{BrowserLauncher, BrowserSession, NavigationOptions};
use crate::{
    config::{BrowserMode, BrowserSettings},
    error::FetchError,
};

pub struct ChromiumLauncher {
    mode: BrowserMode,
    executable_path: Option<PathBuf>,
    request_timeout: Duration,
}

impl ChromiumLauncher {
    pub fn new(settings: &BrowserSettings) -> Self {
        Self {
            mode: settings.mode,
            executable_path: settings.executable_path.clone(),
            request_timeout: Duration::from_secs(settings.navigation_timeout_secs),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, FetchError> {
        let mut builder = BrowserConfig::builder()
            .args(self.mode.launch_args().iter().copied())
            .request_timeout(self.request_timeout);

        if let Some((width, height)) = self.mode.window_size() {
            builder = builder.window_size(width, height);
        }
        if let Some(path) = &self.executable_path {
            debug!("Using Chromium executable at {}", path.display());
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(FetchError::Launch)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, FetchError> {
        let config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Launch(e.to_string()))?;

        // The CDP connection only makes progress while its handler is polled.
        let handler_task = tokio::spawn(async move {
            drive_events(&mut handler).await;
        });

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
        }))
    }
}

/// How long a closing browser gets to exit before it is killed.
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Polls the CDP event stream until it ends, returning how many events failed.
/// A failed event does not end the loop.
async fn drive_events<S, T, E>(events: &mut S) -> usize
where
    S: Stream<Item = Result<T, E>> + Unpin,
    E: Display,
{
    let mut failures = 0;
    while let Some(event) = events.next().await {
        if let Err(e) = event {
            failures += 1;
            debug!("CDP handler event failed: {}", e);
        }
    }
    failures
}

pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn render(&mut self, url: &str, options: &NavigationOptions) -> Result<String, FetchError> {
        let navigation_error = |e: chromiumoxide::error::CdpError| FetchError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        };

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(navigation_error)?;
        page.set_user_agent(options.user_agent.clone())
            .await
            .map_err(navigation_error)?;
        page.goto(url).await.map_err(navigation_error)?;

        tokio::time::sleep(options.settle_delay).await;

        page.content()
            .await
            .map_err(|e| FetchError::Content(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), FetchError> {
        let mut session = *self;
        let closed = session.browser.close().await;
        if let Err(e) = &closed {
            warn!("Closing Chromium failed, killing the process: {}", e);
            if let Some(Err(kill_error)) = session.browser.kill().await {
                debug!("Killing Chromium failed: {}", kill_error);
            }
        }

        let exited = tokio::time::timeout(EXIT_GRACE, session.browser.wait()).await;
        match exited {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => debug!("Waiting for Chromium to exit failed: {}", e),
            Err(_) => {
                warn!("Chromium did not exit within {:?}, killing it", EXIT_GRACE);
                if let Some(Err(e)) = session.browser.kill().await {
                    debug!("Killing Chromium failed: {}", e);
                }
            }
        }
        session.handler_task.abort();
        closed
            .map(|_| ())
            .map_err(|e| FetchError::Shutdown(e.to_string()))
    }
}
