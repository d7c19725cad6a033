use std::time::Instant;
use tracing::{error, info};

use crate::{
    config::ScraperConfig,
    error::FetchError,
    extractor::FixtureExtractor,
    fetcher::{BrowserFetcher, HtmlFetcher},
    types::FixtureReport,
};

/// Fetch-then-extract pipeline for the tracked team's fixture page.
pub struct FixtureScraper {
    html_fetcher: Box<dyn HtmlFetcher>,
    extractor: FixtureExtractor,
    target_url: String,
}

impl FixtureScraper {
    pub fn new(html_fetcher: Box<dyn HtmlFetcher>, config: &ScraperConfig) -> Self {
        Self {
            html_fetcher,
            extractor: FixtureExtractor::new(config.team.clone()),
            target_url: config.target_url.clone(),
        }
    }

    /// The production pipeline: headless Chromium configured from `config`.
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(Box::new(BrowserFetcher::chromium(&config.browser)), config)
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub async fn fetch_fixtures(&self) -> Result<FixtureReport, FetchError> {
        let start = Instant::now();
        let html = self.html_fetcher.fetch_html(&self.target_url).await.map_err(|e| {
            error!("Fetching fixtures failed: {}", e);
            e
        })?;

        let report = self.parse_html(&html);
        info!(
            "Found {} fixtures in {} ms",
            report.count,
            start.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Extraction only, for markup obtained elsewhere.
    pub fn parse_html(&self, html: &str) -> FixtureReport {
        FixtureReport::new(self.extractor.extract(html))
    }
}
