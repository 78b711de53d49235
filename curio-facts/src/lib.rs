//! curio-facts: encyclopedia fact lookup for detected labels
//!
//! Given a text label, queries a public encyclopedia search endpoint and a
//! summary endpoint for a short descriptive paragraph. Candidate terms are
//! tried in order (the label as given, then a naive plural/singular
//! toggle); the first candidate whose summary has a non-empty extract wins.

pub mod client;
pub mod config;
pub mod error;
pub mod resolver;

pub use client::{PageSummary, WikiBackend, WikiClient};
pub use config::FactsConfig;
pub use error::FactError;
pub use resolver::{candidate_terms, Fact, FactResolver};
