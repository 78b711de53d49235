//! HTTP client for the encyclopedia search and summary endpoints

use crate::config::FactsConfig;
use crate::error::{FactError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// One page summary from the encyclopedia
///
/// The extract may be empty; whether an empty extract counts as a usable
/// fact is the resolver's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    /// Canonical page title
    pub title: String,
    /// Short plain-text summary paragraph
    pub extract: String,
    /// Canonical desktop page link, when the endpoint provides one
    pub canonical_url: Option<String>,
}

/// Backend seam for the two encyclopedia endpoints
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WikiBackend: Send + Sync {
    /// Best-matching page title for a free-text term, if any
    async fn search_title(&self, term: &str) -> Result<Option<String>>;

    /// Summary for an exact page title; `None` when the page does not exist
    async fn page_summary(&self, title: &str) -> Result<Option<PageSummary>>;
}

/// reqwest-backed Wikipedia client
pub struct WikiClient {
    client: Client,
    config: FactsConfig,
}

impl WikiClient {
    pub fn new(config: FactsConfig) -> Result<Self> {
        config.validate().map_err(FactError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("curio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl WikiBackend for WikiClient {
    async fn search_title(&self, term: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(&self.config.search_endpoint)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("srlimit", "1"),
                ("srsearch", term),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FactError::InvalidResponse(format!(
                "HTTP {} from search endpoint",
                status
            )));
        }

        let json: Value = response.json().await?;
        let title = json["query"]["search"]
            .as_array()
            .and_then(|results| results.first())
            .and_then(|page| page["title"].as_str())
            .map(|s| s.to_string());

        debug!("Search for {:?} resolved to {:?}", term, title);
        Ok(title)
    }

    async fn page_summary(&self, title: &str) -> Result<Option<PageSummary>> {
        let url = format!(
            "{}/{}",
            self.config.summary_endpoint.trim_end_matches('/'),
            urlencoding::encode(title)
        );

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("No summary page for {:?}", title);
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FactError::InvalidResponse(format!(
                "HTTP {} from summary endpoint",
                status
            )));
        }

        let json: Value = response.json().await?;
        let extract = json["extract"].as_str().unwrap_or("").to_string();
        let canonical_title = json["title"].as_str().unwrap_or(title).to_string();
        let canonical_url = json["content_urls"]["desktop"]["page"]
            .as_str()
            .map(|s| s.to_string());

        Ok(Some(PageSummary {
            title: canonical_title,
            extract,
            canonical_url,
        }))
    }
}
