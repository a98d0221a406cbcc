//! The file produced by an export.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use super::config::{ExportFormat, ExportLayout};

/// A written export file and what went into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportArtifact {
    /// Where the file was written.
    pub path: PathBuf,
    /// File format.
    pub format: ExportFormat,
    /// Row layout used.
    pub layout: ExportLayout,
    /// Number of data rows.
    pub rows: usize,
    /// Column names.
    pub columns: Vec<String>,
    /// File size in bytes.
    pub bytes: usize,
    /// Hex SHA-256 of the file contents.
    pub sha256: String,
    /// When the file was written (ISO 8601).
    pub created_at: String,
}

impl ExportArtifact {
    /// Describes a freshly written file.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        format: ExportFormat,
        layout: ExportLayout,
        columns: Vec<String>,
        rows: usize,
        contents: &[u8],
    ) -> Self {
        Self {
            path: path.into(),
            format,
            layout,
            rows,
            columns,
            bytes: contents.len(),
            sha256: digest(contents),
            created_at: crate::utils::iso_timestamp(),
        }
    }

}

fn digest(contents: &[u8]) -> String {
    hex::encode(Sha256::digest(contents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_digest() {
        let artifact = ExportArtifact::new(
            "out.csv",
            ExportFormat::Csv,
            ExportLayout::Flattened,
            vec!["x".to_string()],
            1,
            b"abc",
        );
        assert_eq!(artifact.bytes, 3);
        assert_eq!(
            artifact.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_artifact_serialization() {
        let artifact = ExportArtifact::new(
            "out.csv",
            ExportFormat::Csv,
            ExportLayout::Flattened,
            Vec::new(),
            0,
            b"",
        );
        let json = serde_json::to_string(&artifact).unwrap();
        let back: ExportArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(artifact, back);
    }
}
