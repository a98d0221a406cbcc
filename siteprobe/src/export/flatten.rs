//! Recursive flattening of analysis documents into single-level records.
//!
//! Key paths are built by joining mapping keys and sequence indices with a
//! separator. Two branches that produce the same path collide; the later leaf
//! replaces the earlier one in place.

use std::collections::HashMap;
use tracing::debug;

use crate::document::{AnalysisDocument, Node, Scalar};

/// Default separator between key-path segments.
pub const DEFAULT_SEPARATOR: &str = "_";

/// Default key under which a document carries independent sub-objects.
pub const DEFAULT_COLLECTION_KEY: &str = "objects";

/// A single-level record of key-path to leaf value.
///
/// Keys are unique and keep first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    entries: Vec<(String, Scalar)>,
    index: HashMap<String, usize>,
    collisions: usize,
}

impl FlatRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any existing value for the same key.
    ///
    /// Returns the replaced value.
    pub fn insert(&mut self, key: impl Into<String>, value: Scalar) -> Option<Scalar> {
        let key = key.into();
        if let Some(&pos) = self.index.get(&key) {
            self.collisions += 1;
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Gets the value for a key path.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the record has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of overwrites that happened while building the record.
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Consumes the record, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<(String, Scalar)> {
        self.entries
    }

    /// Converts to a JSON object.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<K: Into<String>> FromIterator<(K, Scalar)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, Scalar)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Flattens a node into a single record.
///
/// Empty mappings and sequences contribute nothing. A scalar root is stored
/// under the empty key.
#[must_use]
pub fn flatten(node: &Node, separator: &str) -> FlatRecord {
    let mut record = FlatRecord::new();
    walk(node, None, separator, &mut record);
    if record.collisions() > 0 {
        debug!(
            collisions = record.collisions(),
            keys = record.len(),
            "Flattened record had colliding key paths"
        );
    }
    record
}

fn walk(node: &Node, path: Option<&str>, separator: &str, record: &mut FlatRecord) {
    match node {
        Node::Scalar(value) => {
            record.insert(path.unwrap_or_default(), value.clone());
        }
        Node::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                let child = join(path, &i.to_string(), separator);
                walk(item, Some(&child), separator, record);
            }
        }
        Node::Mapping(entries) => {
            for (key, value) in entries {
                let child = join(path, key, separator);
                walk(value, Some(&child), separator, record);
            }
        }
    }
}

fn join(path: Option<&str>, segment: &str, separator: &str) -> String {
    match path {
        Some(prefix) => format!("{prefix}{separator}{segment}"),
        None => segment.to_string(),
    }
}

/// Flattens a document into one or more rows.
///
/// If `collection_key` holds a sequence, every element becomes its own row
/// and the rest of the document is not exported. Otherwise the whole document
/// is one row.
#[must_use]
pub fn flatten_document(
    document: &AnalysisDocument,
    collection_key: &str,
    separator: &str,
) -> Vec<FlatRecord> {
    match document.collection(collection_key) {
        Some(objects) => objects
            .iter()
            .map(|object| flatten(object, separator))
            .collect(),
        None => vec![flatten(&document.root, separator)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn flat(value: serde_json::Value) -> FlatRecord {
        flatten(&Node::from(value), DEFAULT_SEPARATOR)
    }

    #[test]
    fn test_flatten_nested_mapping_and_sequence() {
        let record = flat(json!({"a": {"b": 1, "c": [2, 3]}}));
        assert_eq!(record.to_value(), json!({"a_b": 1, "a_c_0": 2, "a_c_1": 3}));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a_b", "a_c_0", "a_c_1"]);
    }

    #[test]
    fn test_flatten_sequence_of_mappings() {
        let record = flat(json!({"tags": [{"label": "x", "score": 0.5}, {"label": "y"}]}));
        assert_eq!(
            record.to_value(),
            json!({"tags_0_label": "x", "tags_0_score": 0.5, "tags_1_label": "y"})
        );
    }

    #[test]
    fn test_flatten_scalars_and_null() {
        let record = flat(json!({"title": "Home", "flag": false, "missing": null}));
        assert_eq!(record.get("title"), Some(&Scalar::from("Home")));
        assert_eq!(record.get("flag"), Some(&Scalar::Bool(false)));
        assert_eq!(record.get("missing"), Some(&Scalar::Null));
    }

    #[test]
    fn test_flatten_empty_containers_produce_no_keys() {
        let record = flat(json!({"a": {}, "b": [], "c": 1}));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_flatten_scalar_root() {
        let record = flat(json!("only"));
        assert_eq!(record.get(""), Some(&Scalar::from("only")));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_flatten_collision_overwrites_in_place() {
        // "a_b" is produced by both the nested path and the literal key.
        let record = flat(json!({"a": {"b": 1}, "z": 0, "a_b": 2}));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a_b", "z"]);
        assert_eq!(record.get("a_b"), Some(&Scalar::from(2)));
        assert_eq!(record.collisions(), 1);
    }

    #[test]
    fn test_flatten_custom_separator() {
        let record = flatten(&Node::from(json!({"a": {"b": [7]}})), ".");
        assert_eq!(record.to_value(), json!({"a.b.0": 7}));
    }

    #[test]
    fn test_flatten_document_splits_objects() {
        let doc = AnalysisDocument::new(
            "https://example.com",
            json!({"type": "list", "objects": [{"x": 1}, {"x": 2}]}),
        );
        let rows = flatten_document(&doc, DEFAULT_COLLECTION_KEY, DEFAULT_SEPARATOR);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].to_value(), json!({"x": 1}));
        assert_eq!(rows[1].to_value(), json!({"x": 2}));
    }

    #[test]
    fn test_flatten_document_without_objects() {
        let doc = AnalysisDocument::new("https://example.com", json!({"title": "t", "meta": {"lang": "en"}}));
        let rows = flatten_document(&doc, DEFAULT_COLLECTION_KEY, DEFAULT_SEPARATOR);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to_value(), json!({"title": "t", "meta_lang": "en"}));
    }

    #[test]
    fn test_flatten_document_non_sequence_objects() {
        let doc = AnalysisDocument::new("https://example.com", json!({"objects": {"x": 1}}));
        let rows = flatten_document(&doc, DEFAULT_COLLECTION_KEY, DEFAULT_SEPARATOR);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to_value(), json!({"objects_x": 1}));
    }

    #[test]
    fn test_flatten_document_empty_objects() {
        let doc = AnalysisDocument::new("https://example.com", json!({"objects": []}));
        assert!(flatten_document(&doc, DEFAULT_COLLECTION_KEY, DEFAULT_SEPARATOR).is_empty());
    }

    #[test]
    fn test_flat_record_from_iter() {
        let record: FlatRecord = vec![("a", Scalar::from(1)), ("b", Scalar::from(2)), ("a", Scalar::from(3))]
            .into_iter()
            .collect();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(&Scalar::from(3)));
        assert_eq!(record.collisions(), 1);
    }
}
