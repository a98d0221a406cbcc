//! In-memory providers and pacers for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use crate::document::AnalysisDocument;
use crate::errors::{ProviderError, ProviderKind};
use crate::pipeline::Pacer;
use crate::websearch::{AnalysisProvider, Credential, SearchProvider, SearchResponse};

/// A search provider that returns a fixed response and records queries.
#[derive(Debug)]
pub struct StaticSearchProvider {
    result: Result<SearchResponse, ProviderError>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearchProvider {
    /// Returns `response` for every query.
    #[must_use]
    pub fn new(response: SearchResponse) -> Self {
        Self {
            result: Ok(response),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Returns organic results with the given links.
    #[must_use]
    pub fn with_links<S: AsRef<str>>(links: &[S]) -> Self {
        Self::new(SearchResponse::from_links(links))
    }

    /// Fails every query with `status`.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            result: Err(ProviderError::status(ProviderKind::Search, status)),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    /// Number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl SearchProvider for StaticSearchProvider {
    async fn search(
        &self,
        query: &str,
        _api_key: &Credential,
    ) -> Result<SearchResponse, ProviderError> {
        self.queries.lock().push(query.to_string());
        self.result.clone()
    }
}

/// An analysis provider with per-URL scripted failures.
///
/// URLs without a script succeed with a small document containing the URL
/// and a single-element `objects` sequence.
#[derive(Debug, Default)]
pub struct ScriptedAnalysisProvider {
    failures: HashMap<String, u16>,
    bodies: HashMap<String, serde_json::Value>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedAnalysisProvider {
    /// Creates a provider where every URL succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `url` fail with `status`.
    #[must_use]
    pub fn fail_url(mut self, url: impl Into<String>, status: u16) -> Self {
        self.failures.insert(url.into(), status);
        self
    }

    /// Returns `body` for `url`.
    #[must_use]
    pub fn with_body(mut self, url: impl Into<String>, body: serde_json::Value) -> Self {
        self.bodies.insert(url.into(), body);
        self
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AnalysisProvider for ScriptedAnalysisProvider {
    async fn analyze(
        &self,
        url: &str,
        _token: &Credential,
    ) -> Result<AnalysisDocument, ProviderError> {
        self.calls.lock().push(url.to_string());
        if let Some(&status) = self.failures.get(url) {
            return Err(ProviderError::status(ProviderKind::Analysis, status));
        }
        let body = self.bodies.get(url).cloned().unwrap_or_else(|| {
            json!({
                "request": {"pageUrl": url},
                "objects": [{"type": "article", "pageUrl": url}]
            })
        });
        Ok(AnalysisDocument::new(url, body))
    }
}

/// A pacer that records requested pauses without waiting.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    /// Creates a recording pacer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses requested so far.
    #[must_use]
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().push(duration);
    }
}
