//! Tabular view over exported records.

use std::collections::HashMap;

use crate::document::{AnalysisDocument, Node, Scalar};

/// A table whose columns are the union of keys across its rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in first-seen order.
    pub columns: Vec<String>,
    /// Rows aligned to `columns`; `None` marks a key absent from that row.
    pub rows: Vec<Vec<Option<Scalar>>>,
}

impl Table {
    /// Builds a table from keyed records.
    pub fn from_records<I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (String, Scalar)>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut sparse: Vec<Vec<(usize, Scalar)>> = Vec::new();

        for record in records {
            let mut row = Vec::new();
            for (key, value) in record {
                let pos = match positions.get(&key) {
                    Some(&pos) => pos,
                    None => {
                        let pos = columns.len();
                        positions.insert(key.clone(), pos);
                        columns.push(key);
                        pos
                    }
                };
                row.push((pos, value));
            }
            sparse.push(row);
        }

        let width = columns.len();
        let rows = sparse
            .into_iter()
            .map(|cells| {
                let mut row = vec![None; width];
                for (pos, value) in cells {
                    row[pos] = Some(value);
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Builds a table with one row per document and one column per top-level key.
    ///
    /// Nested values are rendered as compact JSON text.
    #[must_use]
    pub fn from_documents(documents: &[AnalysisDocument]) -> Self {
        Self::from_records(documents.iter().map(|doc| {
            doc.top_level()
                .iter()
                .map(|(key, node)| (key.clone(), cell_for(node)))
                .collect::<Vec<_>>()
        }))
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a cell by row index and column name.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&Scalar> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)?.as_ref()
    }
}

fn cell_for(node: &Node) -> Scalar {
    match node {
        Node::Scalar(value) => value.clone(),
        other => Scalar::Text(other.to_value().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_columns_are_union_in_first_seen_order() {
        let table = Table::from_records(vec![
            vec![("a".to_string(), Scalar::from(1)), ("b".to_string(), Scalar::from(2))],
            vec![("c".to_string(), Scalar::from(3)), ("a".to_string(), Scalar::from(4))],
        ]);
        assert_eq!(table.columns, vec!["a", "b", "c"]);
        assert_eq!(
            table.rows,
            vec![
                vec![Some(Scalar::from(1)), Some(Scalar::from(2)), None],
                vec![Some(Scalar::from(4)), None, Some(Scalar::from(3))],
            ]
        );
    }

    #[test]
    fn test_from_documents_renders_nested_as_json() {
        let docs = vec![
            AnalysisDocument::new("u1", json!({"title": "One", "tags": ["x", "y"]})),
            AnalysisDocument::new("u2", json!({"title": "Two", "meta": {"lang": "en"}})),
        ];
        let table = Table::from_documents(&docs);
        assert_eq!(table.columns, vec!["title", "tags", "meta"]);
        assert_eq!(table.cell(0, "tags"), Some(&Scalar::Text(r#"["x","y"]"#.to_string())));
        assert_eq!(table.cell(1, "meta"), Some(&Scalar::Text(r#"{"lang":"en"}"#.to_string())));
        assert_eq!(table.cell(1, "tags"), None);
    }

    #[test]
    fn test_empty_input() {
        let table = Table::from_documents(&[]);
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }
}
