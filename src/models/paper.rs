//! Paper model representing a normalized OpenAlex work.

use serde::{Deserialize, Serialize};

/// An author of a paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Full name of the author (may be empty if the source omits it)
    pub name: String,

    /// Display name of the author's first listed institution, if any
    pub affiliation: Option<String>,
}

impl Author {
    /// Create a new author
    pub fn new(name: impl Into<String>, affiliation: Option<String>) -> Self {
        Self {
            name: name.into(),
            affiliation,
        }
    }
}

/// A scholarly paper normalized from an OpenAlex work object
///
/// Records are constructed once per API result and not mutated afterwards.
/// The `ai_summary` and `main_findings` fields are placeholders for future
/// enrichment and are always empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    /// Paper title
    pub title: String,

    /// Authors in the order returned by the source, no deduplication
    pub authors: Vec<Author>,

    /// Total number of citations received
    pub citation_count: u64,

    /// Year of publication (0 if unknown)
    pub publication_year: i32,

    /// Abstract text reconstructed from the inverted index (empty if absent)
    pub r#abstract: String,

    /// URL to access the paper; a DOI link is preferred over a landing page
    pub url: String,

    /// The search term that produced this record
    pub search_term: String,

    /// Placeholder for an AI-generated summary (always empty)
    pub ai_summary: String,

    /// Placeholder for AI-extracted main findings (always empty)
    pub main_findings: String,
}

impl Paper {
    /// Returns the author names joined with `", "`, as used in CSV export
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
