use crate::Config;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use url::Url;

/// A single arXiv search hit. Every field is always populated; missing feed
/// elements are replaced with the documented defaults so callers never see
/// an absent key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    pub arxiv_id: String,
    pub published: String,
    pub r#abstract: String,
    pub pdf_url: String,
    pub web_url: String,
}

/// Outcome marker for a search request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Success,
    Error,
}

/// Structured search outcome. Provider failures are folded in here as
/// `status: error` with an empty paper list rather than propagated as an
/// `Err`, since search is best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub query: String,
    pub total_results: usize,
    pub papers: Vec<Paper>,
    pub message: String,
}

impl SearchResult {
    fn success(query: &str, papers: Vec<Paper>) -> Self {
        let message = format!("Found {} papers", papers.len());
        Self {
            status: SearchStatus::Success,
            query: query.to_string(),
            total_results: papers.len(),
            papers,
            message,
        }
    }

    fn error(query: &str, message: String) -> Self {
        Self {
            status: SearchStatus::Error,
            query: query.to_string(),
            total_results: 0,
            papers: Vec::new(),
            message,
        }
    }
}

/// Failures internal to one search attempt. Stringified into the result
/// message; never crosses the client boundary as an error value.
#[derive(Debug, Error)]
enum ArxivError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    Parse(String),
}

/// arXiv search client for the public query API.
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: Client,
    base_url: String,
}

impl ArxivClient {
    /// Create a client with the fixed search timeout from configuration.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.arxiv_timeout_secs))
            .user_agent(concat!("research-forge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::Error::Service(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.arxiv_base_url.clone(),
        })
    }

    /// Search arXiv, newest submissions first.
    ///
    /// `category` other than `"all"` is combined with the free-text query as
    /// a logical AND. `max_results` is forwarded to the provider exactly as
    /// supplied, without clamping. Any network, HTTP-status, or parse
    /// failure comes back as a `status: error` result, never as a panic or
    /// an `Err`.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, category: &str, max_results: i64) -> SearchResult {
        info!("Searching arXiv for: {} (category: {})", query, category);

        match self.try_search(query, category, max_results).await {
            Ok(papers) => {
                info!("Found {} papers", papers.len());
                SearchResult::success(query, papers)
            }
            Err(e) => {
                error!("arXiv API error: {}", e);
                SearchResult::error(query, format!("Search failed: {e}"))
            }
        }
    }

    async fn try_search(
        &self,
        query: &str,
        category: &str,
        max_results: i64,
    ) -> Result<Vec<Paper>, ArxivError> {
        let url = self.build_search_url(query, category, max_results)?;
        debug!("arXiv search URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ArxivError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArxivError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ArxivError::Network(e.to_string()))?;

        parse_feed(&body)
    }

    fn build_search_url(
        &self,
        query: &str,
        category: &str,
        max_results: i64,
    ) -> Result<Url, ArxivError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ArxivError::Parse(format!("invalid base URL: {e}")))?;

        let search_query = if category != "all" {
            format!("cat:{category} AND all:{query}")
        } else {
            format!("all:{query}")
        };

        url.query_pairs_mut()
            .append_pair("search_query", &search_query)
            .append_pair("start", "0")
            .append_pair("max_results", &max_results.to_string())
            .append_pair("sortBy", "submittedDate")
            .append_pair("sortOrder", "descending");

        Ok(url)
    }
}

/// Parse an arXiv Atom feed into paper records.
///
/// Matching is namespace-agnostic; each `entry` yields one record with
/// per-field defaults, so a missing sub-element degrades that field only and
/// never fails the whole feed.
fn parse_feed(text: &str) -> Result<Vec<Paper>, ArxivError> {
    use roxmltree::Document;

    let doc = Document::parse(text).map_err(|e| ArxivError::Parse(e.to_string()))?;

    let mut papers = Vec::new();

    for entry in doc.descendants().filter(|n| n.has_tag_name("entry")) {
        let mut title = None;
        let mut authors = Vec::new();
        let mut arxiv_id = None;
        let mut published = None;
        let mut abstract_text = None;

        for child in entry.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "title" => {
                    if let Some(text) = child.text() {
                        title = Some(normalize_ws(text));
                    }
                }
                "author" => {
                    for name_elem in child.descendants().filter(|n| n.has_tag_name("name")) {
                        if let Some(name) = name_elem.text() {
                            authors.push(name.trim().to_string());
                        }
                    }
                }
                "id" => {
                    if let Some(id) = child.text() {
                        // Entry ids look like http://arxiv.org/abs/2401.12345v1;
                        // an id without /abs/ is kept whole.
                        arxiv_id = id.rsplit("/abs/").next().map(|s| s.to_string());
                    }
                }
                "summary" => {
                    if let Some(summary) = child.text() {
                        abstract_text =
                            Some(normalize_ws(summary).chars().take(500).collect::<String>());
                    }
                }
                "published" => {
                    if let Some(date) = child.text() {
                        // ISO timestamp truncated to the date part.
                        published = Some(date.chars().take(10).collect::<String>());
                    }
                }
                _ => {}
            }
        }

        let arxiv_id = arxiv_id.unwrap_or_else(|| "unknown".to_string());

        papers.push(Paper {
            title: title.unwrap_or_else(|| "No title".to_string()),
            authors,
            pdf_url: format!("https://arxiv.org/pdf/{arxiv_id}"),
            web_url: format!("https://arxiv.org/abs/{arxiv_id}"),
            published: published.unwrap_or_else(|| "Unknown".to_string()),
            r#abstract: abstract_text.unwrap_or_default(),
            arxiv_id,
        });
    }

    debug!("Parsed {} papers from arXiv response", papers.len());
    Ok(papers)
}

fn normalize_ws(text: &str) -> String {
    text.trim().replace('\n', " ")
}
