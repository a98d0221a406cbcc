//! Request, plan and report types for one run.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::analyzer::AnalysisFailure;
use crate::document::AnalysisDocument;
use crate::errors::{InputField, InputValidationError};
use crate::export::ExportArtifact;
use crate::query::{build_queries, parse_topics};
use crate::websearch::Credential;

/// Raw user input for a run.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Site to scope the queries to.
    pub base_url: String,
    /// Comma separated topics.
    pub topics: String,
    /// Search provider API key.
    pub search_key: Credential,
    /// Analysis provider token.
    pub analysis_token: Credential,
}

impl RunRequest {
    /// Creates a request from raw strings.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        topics: impl Into<String>,
        search_key: impl AsRef<str>,
        analysis_token: impl AsRef<str>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            topics: topics.into(),
            search_key: Credential::new(search_key),
            analysis_token: Credential::new(analysis_token),
        }
    }

    /// Replaces one field with raw user text.
    pub fn set_field(&mut self, field: InputField, value: &str) {
        match field {
            InputField::BaseUrl => self.base_url = value.to_string(),
            InputField::Topics => self.topics = value.to_string(),
            InputField::SearchApiKey => self.search_key = Credential::new(value),
            InputField::AnalysisToken => self.analysis_token = Credential::new(value),
        }
    }

    /// Fields that are empty after trimming.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<InputField> {
        InputField::ALL
            .into_iter()
            .filter(|field| match field {
                InputField::BaseUrl => self.base_url.trim().is_empty(),
                InputField::Topics => parse_topics(&self.topics).is_empty(),
                InputField::SearchApiKey => self.search_key.is_empty(),
                InputField::AnalysisToken => self.analysis_token.is_empty(),
            })
            .collect()
    }

    /// Checks that every field is filled and normalizes the input.
    pub fn validate(&self) -> Result<ValidatedRequest, InputValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(InputValidationError::new(missing));
        }
        Ok(ValidatedRequest {
            base_url: self.base_url.trim().to_string(),
            topics: parse_topics(&self.topics),
            search_key: self.search_key.clone(),
            analysis_token: self.analysis_token.clone(),
        })
    }
}

/// A request whose fields are all present.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    /// Trimmed base URL.
    pub base_url: String,
    /// Trimmed, non-empty topics.
    pub topics: Vec<String>,
    /// Search provider API key.
    pub search_key: Credential,
    /// Analysis provider token.
    pub analysis_token: Credential,
}

/// Queries generated for a validated request, awaiting a selection.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// The validated input.
    pub request: ValidatedRequest,
    /// One query per topic.
    pub queries: Vec<String>,
}

impl RunPlan {
    /// Builds the queries for a validated request.
    #[must_use]
    pub fn new(request: ValidatedRequest) -> Self {
        let queries = build_queries(&request.base_url, &request.topics);
        Self { request, queries }
    }

    /// Returns the query at `index`.
    #[must_use]
    pub fn query(&self, index: usize) -> Option<&str> {
        self.queries.get(index).map(String::as_str)
    }
}

/// Overall outcome of a run that got past the search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every selected URL was analyzed.
    Completed,
    /// Some URLs failed.
    Partial,
    /// The search returned no organic results.
    NoResults,
    /// Analysis finished but the output file could not be written.
    Unsaved,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Partial => write!(f, "partial"),
            Self::NoResults => write!(f, "no_results"),
            Self::Unsaved => write!(f, "unsaved"),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id of the run.
    pub run_id: Uuid,
    /// The executed query.
    pub query: String,
    /// Links sent for analysis.
    pub links: Vec<String>,
    /// Analysis documents, in link order.
    pub documents: Vec<AnalysisDocument>,
    /// Links that could not be analyzed.
    pub failures: Vec<AnalysisFailure>,
    /// The written output file, if saving succeeded.
    pub artifact: Option<ExportArtifact>,
    /// Why the output file could not be written.
    pub export_error: Option<String>,
    /// Overall outcome.
    pub status: RunStatus,
    /// Start time (ISO 8601).
    pub started_at: String,
    /// End time (ISO 8601).
    pub finished_at: String,
}

impl RunReport {
    /// The documents as a JSON array, for previews.
    #[must_use]
    pub fn preview(&self) -> serde_json::Value {
        serde_json::Value::Array(self.documents.iter().map(AnalysisDocument::to_value).collect())
    }

    /// Whether the output file was written.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.artifact.is_some()
    }
}
