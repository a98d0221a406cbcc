//! Aggregate configuration and pipeline variants.
//!
//! Every field has a serde default, so an empty TOML file is a valid
//! configuration. Credentials are never read from here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::SiteprobeError;
use crate::export::{ExportConfig, ExportFormat, ExportLayout};
use crate::pipeline::RateLimitPolicy;
use crate::websearch::{AnalysisConfig, SearchConfig};

/// Configuration for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteprobeConfig {
    /// Search provider settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Analysis provider settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

impl SiteprobeConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, SiteprobeError> {
        toml::from_str(raw).map_err(|e| SiteprobeError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SiteprobeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SiteprobeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Sets the search configuration.
    #[must_use]
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Sets the analysis configuration.
    #[must_use]
    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    /// Sets the export configuration.
    #[must_use]
    pub fn with_export(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    /// Overrides the output path.
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export.output_path = path.into();
        self
    }
}

/// Packaged combinations of rate limit and export settings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineVariant {
    /// Two requests per window, one spreadsheet row per document.
    #[default]
    Spreadsheet,
    /// Four requests per window, flattened rows written as CSV.
    FlattenedCsv,
}

impl PipelineVariant {
    /// Rate limit policy of the variant.
    #[must_use]
    pub fn rate_limit(&self) -> RateLimitPolicy {
        match self {
            Self::Spreadsheet => RateLimitPolicy::paired(),
            Self::FlattenedCsv => RateLimitPolicy::batched(),
        }
    }

    /// Row layout of the variant.
    #[must_use]
    pub fn layout(&self) -> ExportLayout {
        match self {
            Self::Spreadsheet => ExportLayout::Direct,
            Self::FlattenedCsv => ExportLayout::Flattened,
        }
    }

    /// File format of the variant.
    #[must_use]
    pub fn format(&self) -> ExportFormat {
        match self {
            Self::Spreadsheet => ExportFormat::Xlsx,
            Self::FlattenedCsv => ExportFormat::Csv,
        }
    }

    /// Default output file name.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!("analysis_results.{}", self.format().extension()))
    }

    /// Applies the preset, keeping the window, endpoints and flattening
    /// options of `config`.
    #[must_use]
    pub fn apply(&self, mut config: SiteprobeConfig) -> SiteprobeConfig {
        let window = config.analysis.rate_limit.window;
        config.analysis.rate_limit = self.rate_limit().with_window(window);
        config.export.layout = self.layout();
        config.export.format = self.format();
        config.export.output_path = self.output_path();
        config
    }
}

impl fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spreadsheet => write!(f, "spreadsheet"),
            Self::FlattenedCsv => write!(f, "flattened-csv"),
        }
    }
}
