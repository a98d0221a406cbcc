//! Command line interface.

mod session;

pub use session::{RunOutcome, Session, SessionStats};

use clap::Parser;
use std::path::PathBuf;

use crate::config::{PipelineVariant, SiteprobeConfig};
use crate::errors::SiteprobeError;
use crate::observability::LogFormat;
use crate::pipeline::RunRequest;

/// Site-scoped search, page analysis and tabular export
#[derive(Parser, Debug)]
#[command(name = "siteprobe")]
#[command(version)]
#[command(about = "Search one site for topics, analyze the top results and save them as a table", long_about = None)]
pub struct Cli {
    /// Site to scope the queries to (e.g. graphy.com)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Comma-separated topics (e.g. "locations, delhi")
    #[arg(long)]
    pub topics: Option<String>,

    /// Search API key (can also be set via SERPER_API_KEY env var)
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    pub serper_api_key: Option<String>,

    /// Analysis token (can also be set via DIFFBOT_TOKEN env var)
    #[arg(long, env = "DIFFBOT_TOKEN", hide_env_values = true)]
    pub diffbot_token: Option<String>,

    /// Rate limit and export preset
    #[arg(long, value_enum)]
    pub variant: Option<PipelineVariant>,

    /// Output file (defaults to the variant's file name)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Query index to run without asking
    #[arg(long)]
    pub query: Option<usize>,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Exit after a single run
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Builds the configuration: file, then variant preset, then `--output`.
    ///
    /// Without a file the default variant is always applied.
    pub fn resolve_config(&self) -> Result<SiteprobeConfig, SiteprobeError> {
        let config = match &self.config {
            Some(path) => {
                let loaded = SiteprobeConfig::load(path)?;
                match self.variant {
                    Some(variant) => variant.apply(loaded),
                    None => loaded,
                }
            }
            None => self
                .variant
                .unwrap_or_default()
                .apply(SiteprobeConfig::default()),
        };

        Ok(match &self.output {
            Some(path) => config.with_output_path(path),
            None => config,
        })
    }

    /// Request pre-filled from flags and environment; gaps are prompted for.
    #[must_use]
    pub fn initial_request(&self) -> RunRequest {
        RunRequest::new(
            self.base_url.clone().unwrap_or_default(),
            self.topics.clone().unwrap_or_default(),
            self.serper_api_key.as_deref().unwrap_or_default(),
            self.diffbot_token.as_deref().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ExportFormat, ExportLayout};
    use crate::pipeline::RateLimitPolicy;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "siteprobe",
            "--base-url",
            "graphy.com",
            "--topics",
            "locations, delhi",
            "--serper-api-key",
            "k",
            "--diffbot-token",
            "t",
            "--variant",
            "flattened-csv",
            "--query",
            "1",
            "--log-format",
            "json",
            "--once",
        ])
        .unwrap();

        assert_eq!(cli.variant, Some(PipelineVariant::FlattenedCsv));
        assert_eq!(cli.query, Some(1));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.once);

        let request = cli.initial_request();
        assert!(request.missing_fields().is_empty());
        assert_eq!(request.search_key.expose(), "k");
    }

    #[test]
    fn test_unknown_variant_rejected() {
        assert!(Cli::try_parse_from(["siteprobe", "--variant", "pdf"]).is_err());
    }

    #[test]
    fn test_default_config_is_spreadsheet() {
        let cli = Cli::try_parse_from(["siteprobe"]).unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.export.format, ExportFormat::Xlsx);
        assert_eq!(config.analysis.rate_limit, RateLimitPolicy::paired());
    }

    #[test]
    fn test_output_overrides_variant() {
        let cli = Cli::try_parse_from([
            "siteprobe",
            "--variant",
            "flattened-csv",
            "--output",
            "/tmp/out.csv",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.export.layout, ExportLayout::Flattened);
        assert_eq!(config.export.output_path, PathBuf::from("/tmp/out.csv"));
    }

    #[test]
    fn test_config_file_kept_without_variant() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[export]\nlayout = \"flattened\"\nformat = \"csv\"").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["siteprobe", "--config", path.as_str()]).unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.export.layout, ExportLayout::Flattened);
        assert_eq!(config.export.format, ExportFormat::Csv);
    }
}
