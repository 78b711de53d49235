//! Label-to-fact resolution with ordered candidate fallback

use crate::client::{PageSummary, WikiBackend};
use tracing::{debug, warn};

/// A resolved fact for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    /// Short descriptive paragraph
    pub extract: String,
    /// Source page title for attribution
    pub source_title: String,
    /// Source page URL for attribution
    pub source_url: String,
}

/// Candidate search terms for a label, in the order they are tried: the
/// label as given, then a naive plural/singular toggle.
///
/// The toggle strips a trailing "s" even when that mangles the word ("bus"
/// becomes "bu"); lookups simply miss on such candidates.
pub fn candidate_terms(label: &str) -> Vec<String> {
    let toggled = match label.strip_suffix('s') {
        Some(stripped) => stripped.to_string(),
        None => format!("{}s", label),
    };
    vec![label.to_string(), toggled]
}

/// Resolves a detected label into a short encyclopedia fact
pub struct FactResolver<B: WikiBackend> {
    backend: B,
    page_base_url: String,
}

impl<B: WikiBackend> FactResolver<B> {
    pub fn new(backend: B, page_base_url: impl Into<String>) -> Self {
        Self {
            backend,
            page_base_url: page_base_url.into(),
        }
    }

    /// Resolve a fact for a label, or `None` when every candidate misses
    ///
    /// Candidates are tried in order with early return on the first summary
    /// carrying a non-empty extract. A backend failure at either step
    /// counts as a miss for that candidate, never as a fatal error.
    pub async fn resolve(&self, label: &str) -> Option<Fact> {
        for term in candidate_terms(label) {
            let title = match self.backend.search_title(&term).await {
                Ok(Some(title)) => title,
                Ok(None) => {
                    debug!("No search result for {:?}", term);
                    continue;
                }
                Err(e) => {
                    warn!("Search failed for {:?}: {}", term, e);
                    continue;
                }
            };

            match self.backend.page_summary(&title).await {
                Ok(Some(summary)) if !summary.extract.trim().is_empty() => {
                    return Some(self.to_fact(summary));
                }
                Ok(_) => debug!("No usable summary for {:?}", title),
                Err(e) => warn!("Summary lookup failed for {:?}: {}", title, e),
            }
        }

        None
    }

    fn to_fact(&self, summary: PageSummary) -> Fact {
        let source_url = summary
            .canonical_url
            .unwrap_or_else(|| fallback_page_url(&self.page_base_url, &summary.title));

        Fact {
            extract: summary.extract,
            source_title: summary.title,
            source_url,
        }
    }
}

/// Constructed wiki URL used when the summary carries no canonical link
fn fallback_page_url(base: &str, title: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(&title.replace(' ', "_"))
    )
}
