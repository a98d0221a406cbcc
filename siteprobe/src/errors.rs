//! Error types for siteprobe.
//!
//! Three user-facing failure classes exist: missing input (nothing is sent),
//! a failed search (the run halts) and a failed analysis of a single URL (the
//! run continues). Export errors are carried on the run report, and
//! configuration errors stop the program before any run.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The main error type for siteprobe operations.
#[derive(Debug, Error)]
pub enum SiteprobeError {
    /// Required user input was missing.
    #[error("{0}")]
    Validation(#[from] InputValidationError),

    /// A third-party provider rejected or failed a request.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// The selected query index does not exist.
    #[error("Invalid query selection: {index} (have {available} queries)")]
    InvalidSelection {
        /// The requested index.
        index: usize,
        /// How many queries were generated.
        available: usize,
    },

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A field the user must fill in before a run can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    /// The site to scope queries to.
    BaseUrl,
    /// Comma separated topics.
    Topics,
    /// Search provider API key.
    SearchApiKey,
    /// Analysis provider token.
    AnalysisToken,
}

impl InputField {
    /// All fields in prompt order.
    pub const ALL: [Self; 4] = [
        Self::BaseUrl,
        Self::Topics,
        Self::SearchApiKey,
        Self::AnalysisToken,
    ];

    /// Human readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::BaseUrl => "base URL",
            Self::Topics => "topics",
            Self::SearchApiKey => "search API key",
            Self::AnalysisToken => "analysis token",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when one or more required inputs are empty.
///
/// All missing fields are collected into a single error so the user sees one
/// message per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in all the fields (missing: {})", format_fields(.missing))]
pub struct InputValidationError {
    /// The missing fields, in prompt order.
    pub missing: Vec<InputField>,
}

fn format_fields(fields: &[InputField]) -> String {
    fields
        .iter()
        .map(InputField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

impl InputValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(missing: Vec<InputField>) -> Self {
        Self { missing }
    }
}

/// Which third-party provider produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// The search provider.
    Search,
    /// The content analysis provider.
    Analysis,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Analysis => write!(f, "analysis"),
        }
    }
}

/// A provider call that did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ProviderError {
    /// The provider that failed.
    pub provider: ProviderKind,
    /// The HTTP status, if a response arrived.
    pub status: Option<u16>,
    /// Transport or decoding detail when no status is available.
    pub message: Option<String>,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.provider {
            ProviderKind::Search => "Search error",
            ProviderKind::Analysis => "Analysis error",
        };
        match (self.status, &self.message) {
            (Some(status), _) => write!(f, "{prefix}: {status}"),
            (None, Some(message)) => write!(f, "{prefix}: {message}"),
            (None, None) => write!(f, "{prefix}: unknown failure"),
        }
    }
}

impl ProviderError {
    /// Creates an error for a non-success HTTP status.
    #[must_use]
    pub fn status(provider: ProviderKind, status: u16) -> Self {
        Self {
            provider,
            status: Some(status),
            message: None,
        }
    }

    /// Creates an error for a failure that produced no usable status.
    #[must_use]
    pub fn transport(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            status: None,
            message: Some(message.into()),
        }
    }
}

/// Errors raised while writing an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet serialization failed.
    #[error("Spreadsheet export failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// The table does not fit the output format.
    #[error("Table too large for format: {0}")]
    TooLarge(String),

    /// Writing the file failed.
    #[error("Could not write {path}: {source}")]
    Write {
        /// Target path.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
