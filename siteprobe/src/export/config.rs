//! Export configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::flatten::{DEFAULT_COLLECTION_KEY, DEFAULT_SEPARATOR};

/// How analysis documents become table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportLayout {
    /// One row per document, one column per top-level key.
    #[default]
    Direct,
    /// One row per document or per sub-object, columns are flattened key paths.
    Flattened,
}

impl fmt::Display for ExportLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Flattened => write!(f, "flattened"),
        }
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Excel workbook.
    #[default]
    Xlsx,
    /// Comma separated values, UTF-8.
    Csv,
}

impl ExportFormat {
    /// Conventional file extension.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Configuration for the result exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Row layout.
    #[serde(default)]
    pub layout: ExportLayout,
    /// File format.
    #[serde(default)]
    pub format: ExportFormat,
    /// Where the artifact is written.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Key holding independent sub-objects (flattened layout only).
    #[serde(default = "default_collection_key")]
    pub collection_key: String,
    /// Separator between key-path segments (flattened layout only).
    #[serde(default = "default_separator")]
    pub path_separator: String,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("analysis_results.xlsx")
}

fn default_collection_key() -> String {
    DEFAULT_COLLECTION_KEY.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            layout: ExportLayout::default(),
            format: ExportFormat::default(),
            output_path: default_output_path(),
            collection_key: default_collection_key(),
            path_separator: default_separator(),
        }
    }
}

impl ExportConfig {
    /// Creates a new export configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: ExportLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the format.
    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the output path.
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_config_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.layout, ExportLayout::Direct);
        assert_eq!(config.format, ExportFormat::Xlsx);
        assert_eq!(config.collection_key, "objects");
        assert_eq!(config.path_separator, "_");
    }

    #[test]
    fn test_export_config_deserialize_partial() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"layout": "flattened", "format": "csv"}"#).unwrap();
        assert_eq!(config.layout, ExportLayout::Flattened);
        assert_eq!(config.format, ExportFormat::Csv);
        assert_eq!(config.output_path, PathBuf::from("analysis_results.xlsx"));
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Xlsx.to_string(), "xlsx");
        assert_eq!(ExportLayout::Flattened.to_string(), "flattened");
    }
}
