//! Sequential content analysis of result URLs.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::rate_limit::RateLimiter;
use crate::document::AnalysisDocument;
use crate::errors::ProviderError;
use crate::events::{EventSink, RunEvent};
use crate::websearch::{AnalysisProvider, Credential};

/// Record of a URL that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    /// Position in the requested URL list.
    pub index: usize,
    /// The URL.
    pub url: String,
    /// HTTP status, if a response arrived.
    pub status: Option<u16>,
    /// Error message shown to the user.
    pub error: String,
}

impl AnalysisFailure {
    /// Builds a failure record from a provider error.
    #[must_use]
    pub fn from_error(index: usize, url: impl Into<String>, err: &ProviderError) -> Self {
        Self {
            index,
            url: url.into(),
            status: err.status,
            error: err.to_string(),
        }
    }
}

/// Progress counters for an analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisProgress {
    /// URLs processed so far.
    pub completed: usize,
    /// Total URLs requested.
    pub total: usize,
    /// URL processed last.
    pub current_url: Option<String>,
    /// Successful analyses.
    pub success_count: usize,
    /// Failed analyses.
    pub error_count: usize,
    /// Pauses taken for rate limiting.
    pub pauses: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: f64,
}

impl AnalysisProgress {
    /// Creates new progress tracker.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Returns the completion percentage.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.completed as f64 / self.total as f64) * 100.0
        }
    }

    /// Updates progress with a successful analysis.
    pub fn record_success(&mut self, url: &str, elapsed_ms: f64) {
        self.completed += 1;
        self.success_count += 1;
        self.current_url = Some(url.to_string());
        self.elapsed_ms = elapsed_ms;
    }

    /// Updates progress with a failed analysis.
    pub fn record_error(&mut self, url: &str, elapsed_ms: f64) {
        self.completed += 1;
        self.error_count += 1;
        self.current_url = Some(url.to_string());
        self.elapsed_ms = elapsed_ms;
    }
}

/// Documents and failures from one analysis pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisBatch {
    /// Successfully analyzed documents, in request order.
    pub documents: Vec<AnalysisDocument>,
    /// Failed URLs, in request order.
    pub failures: Vec<AnalysisFailure>,
    /// Final progress counters.
    pub progress: AnalysisProgress,
}

impl AnalysisBatch {
    /// Returns true if any URL failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

}

/// Fetches an analysis document for each URL, one at a time.
#[derive(Clone)]
pub struct ContentAnalyzer {
    provider: Arc<dyn AnalysisProvider>,
    limiter: RateLimiter,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for ContentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentAnalyzer")
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl ContentAnalyzer {
    /// Creates an analyzer.
    #[must_use]
    pub fn new(
        provider: Arc<dyn AnalysisProvider>,
        limiter: RateLimiter,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            provider,
            limiter,
            sink,
        }
    }

    /// Analyzes `urls` in order.
    ///
    /// The rate limiter is consulted before every request. A failed URL is
    /// reported and skipped; it is never retried.
    pub async fn analyze(&self, urls: &[String], token: &Credential) -> AnalysisBatch {
        let started = Instant::now();
        let mut batch = AnalysisBatch {
            progress: AnalysisProgress::new(urls.len()),
            ..Default::default()
        };

        for (index, url) in urls.iter().enumerate() {
            if let Some(pause) = self.limiter.policy().pause_before(index) {
                self.sink.emit(&RunEvent::RateLimitPause {
                    index,
                    seconds: pause.as_secs_f64(),
                });
            }
            if self.limiter.acquire(index).await.is_some() {
                batch.progress.pauses += 1;
            }

            let elapsed = || started.elapsed().as_secs_f64() * 1000.0;
            match self.provider.analyze(url, token).await {
                Ok(document) => {
                    info!(index, url = %url, "Analyzed URL");
                    batch.progress.record_success(url, elapsed());
                    batch.documents.push(document);
                    self.sink.emit(&RunEvent::AnalysisSucceeded {
                        index,
                        url: url.clone(),
                    });
                }
                Err(err) => {
                    warn!(index, url = %url, error = %err, "Analysis failed");
                    batch.progress.record_error(url, elapsed());
                    self.sink.emit(&RunEvent::AnalysisFailed {
                        index,
                        url: url.clone(),
                        message: err.to_string(),
                        status: err.status,
                    });
                    batch.failures.push(AnalysisFailure::from_error(index, url, &err));
                }
            }
        }

        self.sink.emit(&RunEvent::AnalysisFinished {
            documents: batch.documents.len(),
            failures: batch.failures.len(),
        });
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderKind;
    use crate::events::CollectingEventSink;
    use crate::pipeline::RateLimitPolicy;
    use crate::testing::{RecordingPacer, ScriptedAnalysisProvider};
    use crate::websearch::MockAnalysisProvider;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://example.com/{i}")).collect()
    }

    fn analyzer(
        provider: Arc<dyn AnalysisProvider>,
        policy: RateLimitPolicy,
    ) -> (ContentAnalyzer, Arc<RecordingPacer>, Arc<CollectingEventSink>) {
        let pacer = Arc::new(RecordingPacer::new());
        let sink = Arc::new(CollectingEventSink::new());
        let analyzer = ContentAnalyzer::new(
            provider,
            RateLimiter::new(policy, pacer.clone()),
            sink.clone(),
        );
        (analyzer, pacer, sink)
    }

    #[tokio::test]
    async fn test_all_succeed_in_order() {
        let provider = Arc::new(ScriptedAnalysisProvider::new());
        let (analyzer, _, _) = analyzer(provider.clone(), RateLimitPolicy::paired());

        let batch = analyzer.analyze(&urls(5), &Credential::new("tok")).await;

        assert_eq!(batch.documents.len(), 5);
        assert!(!batch.has_failures());
        let analyzed: Vec<&str> = batch.documents.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(analyzed, urls(5).iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(provider.calls(), urls(5));
    }

    #[tokio::test]
    async fn test_paired_policy_pauses_before_two_and_four() {
        let provider = Arc::new(ScriptedAnalysisProvider::new());
        let (analyzer, pacer, sink) = analyzer(provider, RateLimitPolicy::paired());

        let batch = analyzer.analyze(&urls(5), &Credential::new("tok")).await;

        assert_eq!(pacer.pauses(), vec![Duration::from_secs(15); 2]);
        assert_eq!(batch.progress.pauses, 2);
        let paused_at: Vec<usize> = sink
            .events_of_type("analysis.rate_limit_pause")
            .into_iter()
            .filter_map(|e| match e {
                RunEvent::RateLimitPause { index, .. } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(paused_at, vec![2, 4]);
    }

    #[tokio::test]
    async fn test_batched_policy_pauses_before_four_only() {
        let provider = Arc::new(ScriptedAnalysisProvider::new());
        let (analyzer, pacer, sink) = analyzer(provider, RateLimitPolicy::batched());

        analyzer.analyze(&urls(5), &Credential::new("tok")).await;

        assert_eq!(pacer.pauses().len(), 1);
        assert_eq!(
            sink.events_of_type("analysis.rate_limit_pause"),
            vec![RunEvent::RateLimitPause {
                index: 4,
                seconds: 15.0
            }]
        );
    }

    #[tokio::test]
    async fn test_pause_happens_before_request() {
        let provider = Arc::new(ScriptedAnalysisProvider::new());
        let (analyzer, _, sink) = analyzer(provider, RateLimitPolicy::paired());

        analyzer.analyze(&urls(3), &Credential::new("tok")).await;

        let types: Vec<&str> = sink.events().iter().map(RunEvent::event_type).collect();
        assert_eq!(
            types,
            vec![
                "analysis.succeeded",
                "analysis.succeeded",
                "analysis.rate_limit_pause",
                "analysis.succeeded",
                "analysis.finished",
            ]
        );
    }

    #[tokio::test]
    async fn test_one_failure_keeps_other_documents_in_order() {
        let provider = Arc::new(
            ScriptedAnalysisProvider::new().fail_url("https://example.com/2", 500),
        );
        let (analyzer, _, sink) = analyzer(provider.clone(), RateLimitPolicy::paired());

        let batch = analyzer.analyze(&urls(5), &Credential::new("tok")).await;

        assert_eq!(batch.documents.len(), 4);
        let analyzed: Vec<&str> = batch.documents.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(
            analyzed,
            vec![
                "https://example.com/0",
                "https://example.com/1",
                "https://example.com/3",
                "https://example.com/4",
            ]
        );
        assert_eq!(
            batch.failures,
            vec![AnalysisFailure {
                index: 2,
                url: "https://example.com/2".to_string(),
                status: Some(500),
                error: "Analysis error: 500".to_string(),
            }]
        );
        assert_eq!(sink.errors().len(), 1);
        // The failing URL is attempted exactly once.
        assert_eq!(provider.calls().len(), 5);
        assert_eq!(batch.progress.error_count, 1);
        assert_eq!(batch.progress.success_count, 4);
    }

    #[tokio::test]
    async fn test_empty_url_list() {
        let provider = Arc::new(ScriptedAnalysisProvider::new());
        let (analyzer, pacer, _) = analyzer(provider.clone(), RateLimitPolicy::paired());

        let batch = analyzer.analyze(&[], &Credential::new("tok")).await;

        assert!(batch.documents.is_empty());
        assert!(pacer.pauses().is_empty());
        assert!(provider.calls().is_empty());
        assert_eq!(batch.progress.percent(), 0.0);
    }

    #[tokio::test]
    async fn test_token_passed_to_provider() {
        let mut mock = MockAnalysisProvider::new();
        mock.expect_analyze()
            .withf(|url, token| url == "https://example.com/0" && token.expose() == "secret")
            .times(1)
            .returning(|url, _| Ok(AnalysisDocument::new(url, serde_json::json!({"ok": true}))));
        mock.expect_analyze()
            .withf(|url, _| url == "https://example.com/1")
            .times(1)
            .returning(|_, _| Err(ProviderError::status(ProviderKind::Analysis, 401)));

        let (analyzer, _, _) = analyzer(Arc::new(mock), RateLimitPolicy::paired());
        let batch = analyzer.analyze(&urls(2), &Credential::new("secret")).await;

        assert_eq!(batch.documents.len(), 1);
        assert_eq!(batch.failures[0].status, Some(401));
    }

    #[test]
    fn test_progress_percent() {
        let mut progress = AnalysisProgress::new(4);
        progress.record_success("a", 1.0);
        progress.record_error("b", 2.0);
        assert_eq!(progress.percent(), 50.0);
        assert_eq!(progress.current_url.as_deref(), Some("b"));
    }
}
