//! Algolia HN API endpoints and response schema

use anyhow::Context;
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use threadline_core::SourceError;

/// Public Algolia endpoint for Hacker News
pub const DEFAULT_BASE_URL: &str = "https://hn.algolia.com/api/v1";

/// URL builder for the search and profile endpoints
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL: {base_url}"))?;
        anyhow::ensure!(
            !base.cannot_be_a_base(),
            "API base URL cannot take a path: {base_url}"
        );
        Ok(Self { base })
    }

    fn with_path(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// One page of comments belonging to `thread_id`, newest first
    pub fn search_url(&self, thread_id: &str, page: u32, page_size: u32) -> String {
        let mut url = self.with_path(&["search_by_date"]);
        url.query_pairs_mut()
            .append_pair("tags", &format!("comment,story_{thread_id}"))
            .append_pair("hitsPerPage", &page_size.to_string())
            .append_pair("page", &page.to_string());
        url.into()
    }

    /// Profile of a single user
    pub fn user_url(&self, author: &str) -> String {
        self.with_path(&["users", author]).into()
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        }
    }
}

/// One comment hit from the search endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommentRecord {
    pub author: String,
    /// Unix epoch seconds
    pub created_at_i: i64,
    #[serde(rename = "objectID")]
    pub object_id: String,
    /// Raw HTML body
    pub comment_text: String,
}

/// One page of search results
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    pub hits: Vec<CommentRecord>,
    #[serde(rename = "nbPages")]
    pub nb_pages: u32,
    #[serde(rename = "nbHits", default)]
    pub nb_hits: u64,
    #[serde(default)]
    pub page: u32,
}

impl SearchPage {
    pub fn from_json(target: &str, body: &str) -> Result<Self, SourceError> {
        serde_json::from_str(body).map_err(|e| SourceError::schema(target, e))
    }
}

/// Deserialize null as empty string
fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// User profile; only the bio is kept
#[derive(Debug, Default, Deserialize)]
pub struct UserProfile {
    /// Raw HTML "about" text; absent or null becomes empty
    #[serde(default, deserialize_with = "null_to_empty")]
    pub about: String,
}

impl UserProfile {
    pub fn from_json(target: &str, body: &str) -> Result<Self, SourceError> {
        serde_json::from_str(body).map_err(|e| SourceError::schema(target, e))
    }
}
