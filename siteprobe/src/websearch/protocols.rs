//! Protocol traits for the third-party providers.
//!
//! The pipeline only talks to these traits, so HTTP clients, mocks and
//! scripted test providers are interchangeable.

use async_trait::async_trait;

use super::models::{Credential, SearchResponse};
use crate::document::AnalysisDocument;
use crate::errors::ProviderError;

/// Protocol for the search provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Runs one query.
    ///
    /// Any non-success response is an error; the caller must not retry.
    async fn search(
        &self,
        query: &str,
        api_key: &Credential,
    ) -> Result<SearchResponse, ProviderError>;
}

/// Protocol for the content analysis provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Analyzes one URL.
    async fn analyze(
        &self,
        url: &str,
        token: &Credential,
    ) -> Result<AnalysisDocument, ProviderError>;
}
