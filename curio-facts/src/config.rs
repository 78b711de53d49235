//! Configuration for curio-facts

use serde::{Deserialize, Serialize};

/// Encyclopedia endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsConfig {
    /// Free-text search endpoint (MediaWiki action API)
    pub search_endpoint: String,
    /// Summary endpoint base; the exact page title is appended as a path
    /// segment
    pub summary_endpoint: String,
    /// Base used to construct a page URL when the summary carries no
    /// canonical link
    pub page_base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            search_endpoint: "https://en.wikipedia.org/w/api.php".to_string(),
            summary_endpoint: "https://en.wikipedia.org/api/rest_v1/page/summary".to_string(),
            page_base_url: "https://en.wikipedia.org/wiki".to_string(),
            timeout_secs: 30,
        }
    }
}

impl FactsConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [
            ("search_endpoint", &self.search_endpoint),
            ("summary_endpoint", &self.summary_endpoint),
            ("page_base_url", &self.page_base_url),
        ] {
            if !url.starts_with("https://") {
                return Err(format!("{} must be an HTTPS URL", name));
            }
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be non-zero".to_string());
        }

        Ok(())
    }
}
