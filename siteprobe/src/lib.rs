//! # Siteprobe
//!
//! Site-scoped search, page analysis and tabular export.
//!
//! Siteprobe turns a base URL and a list of topics into `site:` queries, runs
//! one of them against a web search provider, sends the top result pages to a
//! content analysis provider and writes the structured results to a file:
//!
//! - **Query building**: one `site:<base> <topic>` query per topic
//! - **Rate-limited analysis**: strictly sequential, with a fixed pause after
//!   every batch of requests
//! - **Export**: one row per document (spreadsheet) or flattened key paths
//!   with one row per sub-object (CSV)
//! - **Events**: every user-visible message is a [`events::RunEvent`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use siteprobe::prelude::*;
//!
//! let pipeline = Pipeline::new(config, search, analysis, sink, Arc::new(TokioPacer));
//! let plan = pipeline.plan(&RunRequest::new("graphy.com", "locations, delhi", key, token))?;
//! let report = pipeline.execute(&plan, 0).await?;
//! if let Some(artifact) = &report.artifact {
//!     println!("saved {}", artifact.path.display());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cli;
pub mod config;
pub mod document;
pub mod errors;
pub mod events;
pub mod export;
pub mod observability;
pub mod pipeline;
pub mod query;
pub mod testing;
pub mod utils;
pub mod websearch;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{PipelineVariant, SiteprobeConfig};
    pub use crate::document::{AnalysisDocument, Node, Scalar};
    pub use crate::errors::{
        ExportError, InputField, InputValidationError, ProviderError, ProviderKind,
        SiteprobeError,
    };
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink, RunEvent};
    pub use crate::export::{ExportArtifact, ExportConfig, ExportFormat, ExportLayout, Exporter};
    pub use crate::pipeline::{
        Pipeline, RateLimitPolicy, RunPlan, RunReport, RunRequest, RunStatus, TokioPacer,
    };
    pub use crate::query::{build_queries, parse_topics};
    pub use crate::utils::{generate_uuid, iso_timestamp, Timestamp};
    pub use crate::websearch::{
        AnalysisProvider, Credential, DiffbotClient, SearchProvider, SerperClient,
    };
}
