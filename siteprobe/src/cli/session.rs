//! Interactive prompt loop over any reader and writer.

use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::errors::{InputField, SiteprobeError};
use crate::pipeline::{Pipeline, RunPlan, RunReport, RunRequest};

/// Result of one pass through the prompts.
#[derive(Debug)]
pub enum RunOutcome {
    /// The run produced a report and saved its output file.
    Finished(Box<RunReport>),
    /// The run produced a report but the output file could not be written.
    Unsaved(Box<RunReport>),
    /// The run stopped with an error that was shown to the user.
    Failed(SiteprobeError),
    /// The input stream ended.
    InputClosed,
}

/// Counters for a whole session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Runs that produced a report.
    pub completed: usize,
    /// Runs that stopped with an error or could not save their results.
    pub failed: usize,
}

/// Prompts for input, runs the pipeline and prints results.
///
/// Progress and provider errors reach the user through the pipeline's event
/// sink; the session writes prompts, the JSON preview and the output path.
pub struct Session<R, W> {
    pipeline: Pipeline,
    input: R,
    output: W,
    defaults: RunRequest,
    query: Option<usize>,
    once: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session.
    pub fn new(pipeline: Pipeline, input: R, output: W) -> Self {
        Self {
            pipeline,
            input,
            output,
            defaults: RunRequest::default(),
            query: None,
            once: false,
        }
    }

    /// Pre-fills fields so they are not prompted for.
    #[must_use]
    pub fn with_defaults(mut self, request: RunRequest) -> Self {
        self.defaults = request;
        self
    }

    /// Runs the query at `index` instead of asking.
    #[must_use]
    pub fn with_query(mut self, index: Option<usize>) -> Self {
        self.query = index;
        self
    }

    /// Stops after the first run.
    #[must_use]
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Consumes the session, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user declines another run or input ends.
    pub async fn run(&mut self) -> io::Result<SessionStats> {
        let mut stats = SessionStats::default();
        loop {
            match self.run_once().await? {
                RunOutcome::InputClosed => break,
                RunOutcome::Finished(_) => stats.completed += 1,
                RunOutcome::Failed(_) | RunOutcome::Unsaved(_) => stats.failed += 1,
            }
            if self.once || !self.confirm("Run another search? [y/N]: ")? {
                break;
            }
        }
        Ok(stats)
    }

    /// Collects input and performs a single run.
    pub async fn run_once(&mut self) -> io::Result<RunOutcome> {
        let Some(request) = self.collect_request()? else {
            return Ok(RunOutcome::InputClosed);
        };

        let plan = match self.pipeline.plan(&request) {
            Ok(plan) => plan,
            Err(err) => return Ok(RunOutcome::Failed(err)),
        };

        let Some(index) = self.select_query(&plan)? else {
            return Ok(RunOutcome::InputClosed);
        };

        match self.pipeline.execute(&plan, index).await {
            Ok(report) => {
                self.print_report(&report)?;
                if report.is_saved() {
                    Ok(RunOutcome::Finished(Box::new(report)))
                } else {
                    Ok(RunOutcome::Unsaved(Box::new(report)))
                }
            }
            Err(err) => {
                if matches!(err, SiteprobeError::InvalidSelection { .. }) {
                    writeln!(self.output, "Error: {err}")?;
                } else {
                    debug!(error = %err, "Run failed");
                }
                Ok(RunOutcome::Failed(err))
            }
        }
    }

    fn collect_request(&mut self) -> io::Result<Option<RunRequest>> {
        let mut request = self.defaults.clone();
        for field in request.missing_fields() {
            let label = match field {
                InputField::BaseUrl => "Enter the base URL (e.g. graphy.com): ",
                InputField::Topics => "Enter topics, comma separated (e.g. locations, delhi): ",
                InputField::SearchApiKey => "Enter your search API key: ",
                InputField::AnalysisToken => "Enter your analysis token: ",
            };
            let Some(value) = self.prompt(label)? else {
                return Ok(None);
            };
            request.set_field(field, &value);
        }
        Ok(Some(request))
    }

    fn select_query(&mut self, plan: &RunPlan) -> io::Result<Option<usize>> {
        if let Some(index) = self.query {
            return Ok(Some(index));
        }
        let last = plan.queries.len().saturating_sub(1);
        loop {
            let Some(answer) = self.prompt(&format!("Select a query [0-{last}] (default 0): "))?
            else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(0));
            }
            match answer.parse() {
                Ok(index) => return Ok(Some(index)),
                Err(_) => writeln!(self.output, "Error: not a query number: {answer}")?,
            }
        }
    }

    fn print_report(&mut self, report: &RunReport) -> io::Result<()> {
        let preview = serde_json::to_string_pretty(&report.preview()).map_err(io::Error::other)?;
        writeln!(self.output, "Analysis results:")?;
        writeln!(self.output, "{preview}")?;
        if !report.failures.is_empty() {
            writeln!(
                self.output,
                "{} of {} URLs could not be analyzed",
                report.failures.len(),
                report.links.len()
            )?;
        }
        match (&report.artifact, &report.export_error) {
            (Some(artifact), _) => writeln!(
                self.output,
                "Results saved to {} ({} rows)",
                artifact.path.display(),
                artifact.rows
            )?,
            (None, error) => writeln!(
                self.output,
                "Error: results were not saved: {}",
                error.as_deref().unwrap_or("unknown error")
            )?,
        }
        self.output.flush()
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn confirm(&mut self, label: &str) -> io::Result<bool> {
        Ok(self
            .prompt(label)?
            .is_some_and(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")))
    }
}
