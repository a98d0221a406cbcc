//! Third-party provider access.
//!
//! This module provides:
//! - Configuration for the search and analysis endpoints
//! - Request/response models and the redacted [`Credential`] type
//! - Protocol traits for pluggable providers
//! - reqwest-based clients for both providers

mod client;
mod config;
mod models;
mod protocols;

pub use client::{DiffbotClient, SerperClient};
pub use config::{AnalysisConfig, SearchConfig};
pub use models::{Credential, OrganicResult, SearchRequest, SearchResponse};
pub use protocols::{AnalysisProvider, SearchProvider};

#[cfg(test)]
pub use protocols::{MockAnalysisProvider, MockSearchProvider};
