//! Count-based rate limiting for outbound analysis requests.
//!
//! The policy allows `max_requests` calls, then waits `window` before the
//! next batch. It does not react to provider feedback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Default pause between batches.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15);

/// How many requests may run before a pause, and how long the pause is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Requests per batch. Values below 1 are treated as 1.
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    /// Pause before each new batch.
    #[serde(default = "default_window", with = "duration_secs")]
    pub window: Duration,
}

fn default_max_requests() -> usize {
    2
}

fn default_window() -> Duration {
    DEFAULT_WINDOW
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::paired()
    }
}

impl RateLimitPolicy {
    /// Creates a policy.
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// Two requests per 15 second window.
    #[must_use]
    pub fn paired() -> Self {
        Self::new(2, DEFAULT_WINDOW)
    }

    /// Four requests per 15 second window.
    #[must_use]
    pub fn batched() -> Self {
        Self::new(4, DEFAULT_WINDOW)
    }

    /// Sets the window.
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Returns the pause required before the request at zero-based `index`.
    ///
    /// A pause happens when `index` is a positive multiple of `max_requests`.
    #[must_use]
    pub fn pause_before(&self, index: usize) -> Option<Duration> {
        let batch = self.max_requests.max(1);
        (index > 0 && index % batch == 0).then_some(self.window)
    }

    /// Indices that are preceded by a pause in a run of `total` requests.
    #[must_use]
    pub fn pause_indices(&self, total: usize) -> Vec<usize> {
        (0..total).filter(|&i| self.pause_before(i).is_some()).collect()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

/// Performs the actual wait.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits for `duration`.
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A policy paired with the pacer that enforces it.
#[derive(Clone)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    pacer: Arc<dyn Pacer>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Creates a limiter.
    #[must_use]
    pub fn new(policy: RateLimitPolicy, pacer: Arc<dyn Pacer>) -> Self {
        Self { policy, pacer }
    }

    /// Creates a limiter that sleeps on the tokio timer.
    #[must_use]
    pub fn with_tokio(policy: RateLimitPolicy) -> Self {
        Self::new(policy, Arc::new(TokioPacer))
    }

    /// Gets the policy.
    #[must_use]
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Waits if the policy requires it before request `index`.
    ///
    /// Returns the pause that was taken.
    pub async fn acquire(&self, index: usize) -> Option<Duration> {
        let pause = self.policy.pause_before(index)?;
        info!(
            index,
            pause_secs = pause.as_secs_f64(),
            "Waiting to comply with rate limit"
        );
        self.pacer.pause(pause).await;
        Some(pause)
    }
}
