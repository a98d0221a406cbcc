//! Search, analyze and export for one selected query.

use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

use super::analyzer::ContentAnalyzer;
use super::rate_limit::{Pacer, RateLimiter};
use super::run::{RunPlan, RunReport, RunRequest, RunStatus};
use crate::config::SiteprobeConfig;
use crate::errors::SiteprobeError;
use crate::events::{EventSink, RunEvent};
use crate::export::Exporter;
use crate::utils::{generate_uuid, iso_timestamp};
use crate::websearch::{AnalysisProvider, SearchProvider};

/// Drives a run from validated input to a written file.
#[derive(Clone)]
pub struct Pipeline {
    config: SiteprobeConfig,
    search: Arc<dyn SearchProvider>,
    analyzer: ContentAnalyzer,
    exporter: Exporter,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(
        config: SiteprobeConfig,
        search: Arc<dyn SearchProvider>,
        analysis: Arc<dyn AnalysisProvider>,
        sink: Arc<dyn EventSink>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        let limiter = RateLimiter::new(config.analysis.rate_limit, pacer);
        let analyzer = ContentAnalyzer::new(analysis, limiter, sink.clone());
        let exporter = Exporter::new(config.export.clone());
        Self {
            config,
            search,
            analyzer,
            exporter,
            sink,
        }
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &SiteprobeConfig {
        &self.config
    }

    /// Validates the request and generates its queries.
    ///
    /// Nothing is sent to either provider.
    pub fn plan(&self, request: &RunRequest) -> Result<RunPlan, SiteprobeError> {
        let validated = request.validate().map_err(|err| {
            self.sink.emit(&RunEvent::ValidationFailed {
                message: err.to_string(),
            });
            err
        })?;

        let plan = RunPlan::new(validated);
        self.sink.emit(&RunEvent::QueriesGenerated {
            queries: plan.queries.clone(),
        });
        Ok(plan)
    }

    /// Runs the query at `query_index`.
    ///
    /// A search failure stops the run before any analysis request. Failed
    /// analyses and a failed export are reported in the returned
    /// [`RunReport`], which keeps the analyzed documents either way.
    pub async fn execute(
        &self,
        plan: &RunPlan,
        query_index: usize,
    ) -> Result<RunReport, SiteprobeError> {
        let query = plan
            .query(query_index)
            .ok_or(SiteprobeError::InvalidSelection {
                index: query_index,
                available: plan.queries.len(),
            })?
            .to_string();

        let run_id = generate_uuid();
        let span = info_span!("run", run_id = %run_id, query = %query);
        self.execute_query(plan, run_id, query).instrument(span).await
    }

    async fn execute_query(
        &self,
        plan: &RunPlan,
        run_id: uuid::Uuid,
        query: String,
    ) -> Result<RunReport, SiteprobeError> {
        let started_at = iso_timestamp();
        self.sink.emit(&RunEvent::SearchStarted {
            query: query.clone(),
        });

        let response = match self.search.search(&query, &plan.request.search_key).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Search failed, stopping run");
                self.sink.emit(&RunEvent::SearchFailed {
                    message: err.to_string(),
                    status: err.status,
                });
                return Err(err.into());
            }
        };

        let links = response.top_links(self.config.search.top_n);
        info!(results = response.organic.len(), selected = links.len(), "Search completed");
        self.sink.emit(&RunEvent::LinksSelected {
            links: links.clone(),
        });

        let batch = self
            .analyzer
            .analyze(&links, &plan.request.analysis_token)
            .await;

        let (artifact, export_error) = match self.exporter.export(&batch.documents) {
            Ok(artifact) => {
                self.sink.emit(&RunEvent::ExportCompleted {
                    path: artifact.path.display().to_string(),
                    rows: artifact.rows,
                });
                (Some(artifact), None)
            }
            Err(err) => {
                warn!(error = %err, documents = batch.documents.len(), "Export failed");
                self.sink.emit(&RunEvent::ExportFailed {
                    message: err.to_string(),
                });
                (None, Some(err.to_string()))
            }
        };

        let status = if export_error.is_some() {
            RunStatus::Unsaved
        } else if links.is_empty() {
            RunStatus::NoResults
        } else if batch.has_failures() {
            RunStatus::Partial
        } else {
            RunStatus::Completed
        };
        info!(%status, documents = batch.documents.len(), "Run finished");

        Ok(RunReport {
            run_id,
            query,
            links,
            documents: batch.documents,
            failures: batch.failures,
            artifact,
            export_error,
            status,
            started_at,
            finished_at: iso_timestamp(),
        })
    }
}
