//! Run orchestration.
//!
//! This module provides:
//! - Count-based rate limiting with a pluggable pacer
//! - Sequential content analysis with per-URL failure records
//! - Run request validation, plans and reports
//! - The [`Pipeline`] that chains search, analysis and export

mod analyzer;
mod orchestrator;
mod rate_limit;
mod run;

pub use analyzer::{AnalysisBatch, AnalysisFailure, AnalysisProgress, ContentAnalyzer};
pub use orchestrator::Pipeline;
pub use rate_limit::{Pacer, RateLimitPolicy, RateLimiter, TokioPacer, DEFAULT_WINDOW};
pub use run::{RunPlan, RunReport, RunRequest, RunStatus, ValidatedRequest};
