//! Result export.
//!
//! This module provides:
//! - Recursive flattening of analysis documents
//! - Table construction with union-of-keys columns
//! - CSV and spreadsheet serializers
//! - The [`Exporter`] that ties layout, format and output path together

mod artifact;
mod config;
pub mod flatten;
mod table;
mod writer;

pub use artifact::ExportArtifact;
pub use config::{ExportConfig, ExportFormat, ExportLayout};
pub use flatten::{flatten, flatten_document, FlatRecord};
pub use table::Table;
pub use writer::{write_csv, write_spreadsheet, MAX_CELL_CHARS};

use tracing::info;

use crate::document::AnalysisDocument;
use crate::errors::ExportError;

/// Converts analysis documents into a saved table.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    /// Creates an exporter.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Builds the table for the configured layout.
    #[must_use]
    pub fn build_table(&self, documents: &[AnalysisDocument]) -> Table {
        match self.config.layout {
            ExportLayout::Direct => Table::from_documents(documents),
            ExportLayout::Flattened => Table::from_records(documents.iter().flat_map(|doc| {
                flatten_document(doc, &self.config.collection_key, &self.config.path_separator)
                    .into_iter()
                    .map(FlatRecord::into_entries)
            })),
        }
    }

    /// Serializes a table in the configured format.
    pub fn render(&self, table: &Table) -> Result<Vec<u8>, ExportError> {
        match self.config.format {
            ExportFormat::Xlsx => write_spreadsheet(table),
            ExportFormat::Csv => write_csv(table),
        }
    }

    /// Builds, renders and writes the documents to the configured path.
    pub fn export(&self, documents: &[AnalysisDocument]) -> Result<ExportArtifact, ExportError> {
        let table = self.build_table(documents);
        let contents = self.render(&table)?;
        let path = &self.config.output_path;

        std::fs::write(path, &contents).map_err(|source| ExportError::Write {
            path: path.display().to_string(),
            source,
        })?;

        info!(
            path = %path.display(),
            format = %self.config.format,
            layout = %self.config.layout,
            rows = table.row_count(),
            columns = table.columns.len(),
            "Data saved"
        );

        Ok(ExportArtifact::new(
            path.clone(),
            self.config.format,
            self.config.layout,
            table.columns,
            table.rows.len(),
            &contents,
        ))
    }
}
