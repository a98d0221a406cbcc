//! Data models for provider requests and responses.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// A caller-supplied secret (API key or token).
///
/// `Debug` and `Display` never show the value.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential(String);

impl Credential {
    /// Wraps a secret, trimming surrounding whitespace.
    #[must_use]
    pub fn new(secret: impl AsRef<str>) -> Self {
        Self(secret.as_ref().trim().to_string())
    }

    /// Returns the secret for use in a request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Request body for the search provider.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    /// The query string.
    pub q: &'a str,
}

/// One organic (non-advertisement) search result.
///
/// Every field is optional and wrongly typed fields read as absent, so one
/// odd entry never fails the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicResult {
    /// Result URL. Sitelink-only entries have none.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
    /// Result title.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    /// Result snippet.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub snippet: Option<String>,
    /// Rank reported by the provider, as a number or a numeric string.
    #[serde(
        default,
        deserialize_with = "lenient_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<u32>,
    /// Any other provider fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl OrganicResult {
    /// Creates a result with only a link.
    #[must_use]
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            ..Self::default()
        }
    }

    /// The link, if present and non-empty.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.link.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_position<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_results<'de, D>(deserializer: D) -> Result<Vec<OrganicResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        debug!("Search response `organic` is not a list, treating as empty");
        return Ok(Vec::new());
    };
    let total = items.len();
    let results: Vec<OrganicResult> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if results.len() < total {
        debug!(dropped = total - results.len(), "Skipped malformed organic results");
    }
    Ok(results)
}

/// Parsed search provider response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Organic results in rank order. Absent in the response means empty.
    #[serde(default, deserialize_with = "lenient_results")]
    pub organic: Vec<OrganicResult>,
    /// Any other provider fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl SearchResponse {
    /// Creates a response from organic results.
    #[must_use]
    pub fn from_organic(organic: Vec<OrganicResult>) -> Self {
        Self {
            organic,
            extra: serde_json::Map::new(),
        }
    }

    /// Creates a response whose organic results are the given links.
    #[must_use]
    pub fn from_links<S: AsRef<str>>(links: &[S]) -> Self {
        Self::from_organic(
            links
                .iter()
                .map(|l| OrganicResult::new(l.as_ref()))
                .collect(),
        )
    }

    /// The first `n` result links, in rank order.
    ///
    /// Results without a link are skipped and do not count towards `n`.
    #[must_use]
    pub fn top_links(&self, n: usize) -> Vec<String> {
        self.organic
            .iter()
            .filter_map(OrganicResult::url)
            .take(n)
            .map(str::to_string)
            .collect()
    }
}
