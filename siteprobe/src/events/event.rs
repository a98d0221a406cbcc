//! Progress and status events emitted during a run.

use serde::{Deserialize, Serialize};

/// How prominently an event should be shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Progress or status.
    Info,
    /// Completed successfully.
    Success,
    /// A failure the user must see.
    Error,
}

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// Input validation failed; nothing was sent.
    ValidationFailed {
        /// The validation message.
        message: String,
    },
    /// Queries were generated from the topics.
    QueriesGenerated {
        /// The generated queries.
        queries: Vec<String>,
    },
    /// The search request is about to be sent.
    SearchStarted {
        /// The selected query.
        query: String,
    },
    /// The search provider failed; the run stops here.
    SearchFailed {
        /// The provider error message.
        message: String,
        /// HTTP status, if any.
        status: Option<u16>,
    },
    /// The top result links were selected for analysis.
    LinksSelected {
        /// The selected links.
        links: Vec<String>,
    },
    /// The analyzer is waiting before the next request.
    RateLimitPause {
        /// Index of the request that will follow the pause.
        index: usize,
        /// Pause length in seconds.
        seconds: f64,
    },
    /// One URL was analyzed.
    AnalysisSucceeded {
        /// Position in the URL list.
        index: usize,
        /// The URL.
        url: String,
    },
    /// One URL could not be analyzed; the run continues.
    AnalysisFailed {
        /// Position in the URL list.
        index: usize,
        /// The URL.
        url: String,
        /// The provider error message.
        message: String,
        /// HTTP status, if any.
        status: Option<u16>,
    },
    /// All URLs were processed.
    AnalysisFinished {
        /// Documents obtained.
        documents: usize,
        /// URLs that failed.
        failures: usize,
    },
    /// The output file was written.
    ExportCompleted {
        /// Where the file was written.
        path: String,
        /// Data rows written.
        rows: usize,
    },
    /// The export step failed.
    ExportFailed {
        /// The error message.
        message: String,
    },
}

impl RunEvent {
    /// Dotted event type, e.g. `analysis.failed`.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => "input.invalid",
            Self::QueriesGenerated { .. } => "queries.generated",
            Self::SearchStarted { .. } => "search.started",
            Self::SearchFailed { .. } => "search.failed",
            Self::LinksSelected { .. } => "search.links_selected",
            Self::RateLimitPause { .. } => "analysis.rate_limit_pause",
            Self::AnalysisSucceeded { .. } => "analysis.succeeded",
            Self::AnalysisFailed { .. } => "analysis.failed",
            Self::AnalysisFinished { .. } => "analysis.finished",
            Self::ExportCompleted { .. } => "export.completed",
            Self::ExportFailed { .. } => "export.failed",
        }
    }

    /// Display severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::ValidationFailed { .. }
            | Self::SearchFailed { .. }
            | Self::AnalysisFailed { .. }
            | Self::ExportFailed { .. } => Severity::Error,
            Self::ExportCompleted { .. } => Severity::Success,
            _ => Severity::Info,
        }
    }

    /// The message shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::ValidationFailed { message }
            | Self::SearchFailed { message, .. }
            | Self::ExportFailed { message } => message.clone(),
            Self::QueriesGenerated { queries } => {
                let mut out = String::from("Generated Search Queries:");
                for (i, query) in queries.iter().enumerate() {
                    out.push_str(&format!("\n  [{i}] {query}"));
                }
                out
            }
            Self::SearchStarted { query } => format!("Searching: {query}"),
            Self::LinksSelected { links } => {
                let mut out = format!("First {} URLs:", links.len());
                for link in links {
                    out.push_str(&format!("\n  {link}"));
                }
                out
            }
            Self::RateLimitPause { seconds, .. } => {
                format!("Waiting for {seconds} seconds to comply with rate limit...")
            }
            Self::AnalysisSucceeded { index, url } => format!("Analyzed [{index}] {url}"),
            Self::AnalysisFailed { url, message, .. } => format!("{message} ({url})"),
            Self::AnalysisFinished {
                documents,
                failures,
            } => format!("Analysis finished: {documents} documents, {failures} failed"),
            Self::ExportCompleted { path, .. } => format!("Data saved to {path}"),
        }
    }

    /// Converts to a JSON payload.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_and_severity() {
        let event = RunEvent::AnalysisFailed {
            index: 1,
            url: "https://example.com/a".to_string(),
            message: "Analysis error: 500".to_string(),
            status: Some(500),
        };
        assert_eq!(event.event_type(), "analysis.failed");
        assert_eq!(event.severity(), Severity::Error);
        assert_eq!(event.message(), "Analysis error: 500 (https://example.com/a)");
    }

    #[test]
    fn test_rate_limit_message() {
        let event = RunEvent::RateLimitPause {
            index: 2,
            seconds: 15.0,
        };
        assert_eq!(
            event.message(),
            "Waiting for 15 seconds to comply with rate limit..."
        );
        assert_eq!(event.severity(), Severity::Info);
    }

    #[test]
    fn test_queries_message_lists_indices() {
        let event = RunEvent::QueriesGenerated {
            queries: vec!["site:a.com x".to_string(), "site:a.com y".to_string()],
        };
        let msg = event.message();
        assert!(msg.contains("[0] site:a.com x"));
        assert!(msg.contains("[1] site:a.com y"));
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = RunEvent::ExportCompleted {
            path: "out.csv".to_string(),
            rows: 3,
        };
        let value = event.to_value();
        assert_eq!(value["type"], "export_completed");
        assert_eq!(value["rows"], 3);
        assert_eq!(event.severity(), Severity::Success);
    }
}
