//! OpenAlex client implementation.
//!
//! Uses the OpenAlex REST API. Requests carry a `mailto` parameter and a
//! matching `User-Agent` so they land in the polite pool.

use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::client::ClientError;
use crate::config::Config;
use crate::models::{Author, Paper};

/// Default number of papers fetched per search term
pub const DEFAULT_LIMIT: usize = 10;

/// Minimum spacing between consecutive requests from one client instance
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// Fields requested from the works endpoint
const SELECT_FIELDS: &str = "display_name,authorships,abstract_inverted_index,\
cited_by_count,publication_year,doi,primary_location";

/// Client for the OpenAlex works search endpoint
///
/// Owns its rate limiter; concurrent instances do not coordinate. If an
/// application needs cross-instance throttling it must share one client.
#[derive(Debug)]
pub struct OpenAlexClient {
    http: Client,
    base_url: Url,
    mailto: String,
    limiter: DefaultDirectRateLimiter,
}

impl OpenAlexClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid base URL {:?}: {e}", config.base_url))
        })?;

        let http = Client::builder()
            .user_agent(format!(
                "{}/{} (mailto:{})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                config.mailto
            ))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let quota = Quota::with_period(MIN_REQUEST_INTERVAL).expect("interval is non-zero");

        Ok(Self {
            http,
            base_url,
            mailto: config.mailto.clone(),
            limiter: RateLimiter::direct(quota),
        })
    }

    /// Retrieve the top cited papers for a search term.
    ///
    /// Fetches a single page of up to `limit` works sorted by descending
    /// citation count. When `min_year` is given, a
    /// `from_publication_date` filter is sent server-side; results below
    /// `min_year` are also dropped client-side, so the bound holds even when
    /// the server filter was rejected and retried away.
    ///
    /// A 403 response with the year filter present is retried once with the
    /// filter removed (some deployments reject the filter syntax). Any other
    /// non-2xx status is a hard failure carrying the response body.
    pub async fn top_cited(
        &self,
        search_term: &str,
        limit: usize,
        min_year: Option<i32>,
    ) -> Result<Vec<Paper>, ClientError> {
        if search_term.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "search term must be non-empty".to_string(),
            ));
        }

        self.limiter.until_ready().await;

        let mut url = self.works_url(search_term, limit)?;
        if let Some(year) = min_year {
            url.query_pairs_mut()
                .append_pair("filter", &format!("from_publication_date:{year}"));
            debug!(year, "applying publication date filter");
        }
        debug!(%url, "requesting works");

        let mut response = self.http.get(url).send().await?;

        if response.status() == StatusCode::FORBIDDEN && min_year.is_some() {
            let body = response.text().await.unwrap_or_default();
            warn!(%body, "filter rejected with 403, retrying without publication date filter");
            let retry_url = self.works_url(search_term, limit)?;
            response = self.http.get(retry_url).send().await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let document: WorksResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        debug!(total = document.meta.count, "total results found");

        let mut papers = Vec::new();
        for work in document.results {
            let publication_year = work.publication_year.unwrap_or(0);
            if let Some(year) = min_year {
                // Backstop in case the server-side filter was not applied.
                if publication_year < year {
                    continue;
                }
            }
            papers.push(parse_work(work, search_term));
        }

        info!(count = papers.len(), term = search_term, "papers processed");
        Ok(papers)
    }

    fn works_url(&self, search_term: &str, limit: usize) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join("works")
            .map_err(|e| ClientError::InvalidRequest(format!("invalid works URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("search", search_term)
            .append_pair("sort", "cited_by_count:desc")
            .append_pair("per_page", &limit.to_string())
            .append_pair("select", SELECT_FIELDS)
            .append_pair("mailto", &self.mailto);
        Ok(url)
    }
}

/// Normalize one work object into a [`Paper`].
///
/// Every field has a named default resolved here; a missing or malformed
/// abstract never aborts the record.
fn parse_work(work: Work, search_term: &str) -> Paper {
    let title = work.display_name.unwrap_or_default();
    let citation_count = work.cited_by_count;
    let publication_year = work.publication_year.unwrap_or(0);

    // Prefer a DOI link over the landing page.
    let url = if let Some(doi) = &work.doi {
        format!("https://doi.org/{doi}")
    } else if let Some(landing) = work
        .primary_location
        .as_ref()
        .and_then(|l| l.landing_page_url.clone())
    {
        landing
    } else {
        String::new()
    };

    let authors = work
        .authorships
        .iter()
        .map(|authorship| {
            let name = authorship
                .author
                .as_ref()
                .and_then(|a| a.display_name.clone())
                .unwrap_or_default();
            let affiliation = authorship
                .institutions
                .first()
                .and_then(|i| i.display_name.clone());
            Author::new(name, affiliation)
        })
        .collect();

    let abstract_text = match &work.abstract_inverted_index {
        Some(index) => match rebuild_abstract(index) {
            Ok(text) => text,
            Err(reason) => {
                warn!(%reason, title = %title, "failed to rebuild abstract");
                String::new()
            }
        },
        None => String::new(),
    };

    debug!(
        title = %title,
        citations = citation_count,
        year = publication_year,
        "processed paper"
    );

    Paper {
        title,
        authors,
        citation_count,
        publication_year,
        r#abstract: abstract_text,
        url,
        search_term: search_term.to_string(),
        ai_summary: String::new(),
        main_findings: String::new(),
    }
}

/// Rebuild abstract text from OpenAlex's inverted-index encoding.
///
/// The index maps each word to the positions where it occurs. Slots are grown
/// with empty placeholders and joined with single spaces, so positions the
/// index never mentions show up as consecutive spaces. That gap is kept as-is.
///
/// The index is taken as loose JSON so a malformed value degrades to an empty
/// abstract instead of failing the whole response.
fn rebuild_abstract(index: &serde_json::Value) -> Result<String, String> {
    let entries = index
        .as_object()
        .ok_or_else(|| "inverted index is not an object".to_string())?;

    let mut slots: Vec<&str> = Vec::new();
    for (word, positions) in entries {
        let positions = positions
            .as_array()
            .ok_or_else(|| format!("positions for {word:?} are not an array"))?;
        for position in positions {
            let position = position
                .as_u64()
                .ok_or_else(|| format!("non-integer position for {word:?}"))?
                as usize;
            if slots.len() <= position {
                slots.resize(position + 1, "");
            }
            slots[position] = word.as_str();
        }
    }

    Ok(slots.join(" "))
}

// ===== OpenAlex API Types =====

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Deserialize)]
struct Work {
    display_name: Option<String>,
    #[serde(default)]
    cited_by_count: u64,
    publication_year: Option<i32>,
    doi: Option<String>,
    primary_location: Option<WorkLocation>,
    #[serde(default)]
    authorships: Vec<Authorship>,
    abstract_inverted_index: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WorkLocation {
    landing_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Authorship {
    author: Option<WorkAuthor>,
    #[serde(default)]
    institutions: Vec<Institution>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Institution {
    display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn work_from(value: serde_json::Value) -> Work {
        serde_json::from_value(value).expect("valid work fixture")
    }

    #[test]
    fn test_rebuild_abstract_with_gap() {
        let index = json!({"a": [0], "quick": [1], "fox": [3]});
        // Position 2 is never filled, leaving a double space.
        assert_eq!(rebuild_abstract(&index).unwrap(), "a quick  fox");
    }

    #[test]
    fn test_rebuild_abstract_repeated_word() {
        let index = json!({"the": [0, 2], "cat": [1], "sat": [3]});
        assert_eq!(rebuild_abstract(&index).unwrap(), "the cat the sat");
    }

    #[test]
    fn test_rebuild_abstract_empty_index() {
        let index = json!({});
        assert_eq!(rebuild_abstract(&index).unwrap(), "");
    }

    #[test]
    fn test_rebuild_abstract_malformed() {
        assert!(rebuild_abstract(&json!([1, 2, 3])).is_err());
        assert!(rebuild_abstract(&json!({"word": "not-an-array"})).is_err());
        assert!(rebuild_abstract(&json!({"word": ["not-a-number"]})).is_err());
    }

    #[test]
    fn test_parse_work_prefers_doi_over_landing_page() {
        let work = work_from(json!({
            "display_name": "Test Paper",
            "doi": "10.1234/test",
            "primary_location": {"landing_page_url": "https://example.com/paper"},
            "cited_by_count": 100,
            "publication_year": 2023
        }));
        let paper = parse_work(work, "test");
        assert_eq!(paper.url, "https://doi.org/10.1234/test");
    }

    #[test]
    fn test_parse_work_falls_back_to_landing_page() {
        let work = work_from(json!({
            "display_name": "Test Paper",
            "primary_location": {"landing_page_url": "https://example.com/paper"}
        }));
        let paper = parse_work(work, "test");
        assert_eq!(paper.url, "https://example.com/paper");
    }

    #[test]
    fn test_parse_work_without_any_url() {
        let work = work_from(json!({"display_name": "Test Paper"}));
        let paper = parse_work(work, "test");
        assert_eq!(paper.url, "");
    }

    #[test]
    fn test_parse_work_defaults() {
        let work = work_from(json!({}));
        let paper = parse_work(work, "test");
        assert_eq!(paper.title, "");
        assert_eq!(paper.citation_count, 0);
        assert_eq!(paper.publication_year, 0);
        assert_eq!(paper.r#abstract, "");
        assert!(paper.authors.is_empty());
        assert_eq!(paper.search_term, "test");
        assert_eq!(paper.ai_summary, "");
        assert_eq!(paper.main_findings, "");
    }

    #[test]
    fn test_parse_work_authors_keep_source_order() {
        let work = work_from(json!({
            "display_name": "Test Paper",
            "authorships": [
                {
                    "author": {"display_name": "John Doe"},
                    "institutions": [
                        {"display_name": "Test University"},
                        {"display_name": "Second University"}
                    ]
                },
                {"author": {"display_name": "Jane Smith"}},
                {"author": {}}
            ]
        }));
        let paper = parse_work(work, "test");
        assert_eq!(paper.authors.len(), 3);
        assert_eq!(paper.authors[0].name, "John Doe");
        assert_eq!(
            paper.authors[0].affiliation.as_deref(),
            Some("Test University")
        );
        assert_eq!(paper.authors[1].name, "Jane Smith");
        assert_eq!(paper.authors[1].affiliation, None);
        assert_eq!(paper.authors[2].name, "");
    }

    #[test]
    fn test_parse_work_malformed_abstract_degrades_to_empty() {
        let work = work_from(json!({
            "display_name": "Test Paper",
            "abstract_inverted_index": "definitely not an index"
        }));
        let paper = parse_work(work, "test");
        assert_eq!(paper.r#abstract, "");
        assert_eq!(paper.title, "Test Paper");
    }
}
