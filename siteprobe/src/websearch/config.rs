//! Configuration types for the search and analysis providers.

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use crate::pipeline::RateLimitPolicy;

/// Configuration for the search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    /// Header carrying the API key.
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    /// How many organic results are analyzed.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Request timeout in seconds; `None` keeps the transport default.
    #[serde(default, deserialize_with = "timeout_secs")]
    pub timeout_seconds: Option<f64>,
}

/// Accepts a finite, positive number of seconds.
fn timeout_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let Some(secs) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) if !duration.is_zero() => Ok(Some(secs)),
        _ => Err(serde::de::Error::custom(format!(
            "timeout_seconds must be a positive number of seconds, got {secs}"
        ))),
    }
}

fn default_search_endpoint() -> String {
    "https://google.serper.dev/search".to_string()
}

fn default_api_key_header() -> String {
    "X-API-KEY".to_string()
}

fn default_top_n() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key_header: default_api_key_header(),
            top_n: default_top_n(),
            timeout_seconds: None,
        }
    }
}

impl SearchConfig {
    /// Creates a new search configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.and_then(|s| Duration::try_from_secs_f64(s).ok())
    }
}

/// Configuration for the content analysis provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analysis endpoint.
    #[serde(default = "default_analysis_endpoint")]
    pub endpoint: String,
    /// Pause cadence between requests.
    #[serde(default)]
    pub rate_limit: RateLimitPolicy,
    /// Request timeout in seconds; `None` keeps the transport default.
    #[serde(default, deserialize_with = "timeout_secs")]
    pub timeout_seconds: Option<f64>,
}

fn default_analysis_endpoint() -> String {
    "https://api.diffbot.com/v3/analyze".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_analysis_endpoint(),
            rate_limit: RateLimitPolicy::default(),
            timeout_seconds: None,
        }
    }
}

impl AnalysisConfig {
    /// Creates a new analysis configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the rate-limit policy.
    #[must_use]
    pub fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.and_then(|s| Duration::try_from_secs_f64(s).ok())
    }
}
