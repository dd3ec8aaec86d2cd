/*!
 * Search result records as produced by the search front-end.
 *
 * Only `title` and `snippet` are ever rewritten by translation. Every other
 * field, including ones this crate does not know about, is carried through
 * untouched.
 */

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Result URL
    pub url: String,
    /// Result description
    #[serde(default)]
    pub snippet: String,
    /// Shortened URL for display; `Some(None)` is an explicit `null`
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub display_url: Option<Option<String>>,
    /// Fields this crate passes through without interpreting
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            display_url: None,
            extra: Map::new(),
        }
    }

    pub fn with_display_url(mut self, display_url: impl Into<String>) -> Self {
        self.display_url = Some(Some(display_url.into()));
        self
    }

    pub fn display_url(&self) -> Option<&str> {
        self.display_url.as_ref().and_then(|url| url.as_deref())
    }

    /// Copy of this record with new title and snippet
    pub fn with_text(&self, title: String, snippet: String) -> Self {
        Self {
            title,
            snippet,
            ..self.clone()
        }
    }
}

/// Marks a field as present, so `null` stays apart from a missing key
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A summarized search: AI summary plus the sources it cites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Summary with inline citations
    pub summary: String,
    /// Cited results
    #[serde(default)]
    pub sources: Vec<SearchResult>,
    /// Fields this crate passes through without interpreting
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Documents accepted by the `results` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchDocument {
    /// A bare list of results
    Results(Vec<SearchResult>),
    /// A summary with its sources
    Response(SearchResponse),
}
