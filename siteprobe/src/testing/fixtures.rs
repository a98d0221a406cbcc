//! Sample analysis documents.

use serde_json::json;

use crate::document::AnalysisDocument;

/// An article page with an `objects` sequence of two entries.
#[must_use]
pub fn article_document() -> AnalysisDocument {
    AnalysisDocument::new(
        "https://graphy.com/blog/locations",
        json!({
            "request": {
                "pageUrl": "https://graphy.com/blog/locations",
                "api": "analyze",
                "version": 3
            },
            "humanLanguage": "en",
            "type": "article",
            "objects": [
                {
                    "type": "article",
                    "title": "Top locations",
                    "tags": [{"label": "Delhi", "score": 0.91}],
                    "images": [{"url": "https://graphy.com/a.png", "primary": true}]
                },
                {
                    "type": "article",
                    "title": "More locations",
                    "tags": []
                }
            ]
        }),
    )
}

/// A page whose analysis produced no `objects` key.
#[must_use]
pub fn plain_document() -> AnalysisDocument {
    AnalysisDocument::new(
        "https://graphy.com/about",
        json!({
            "type": "other",
            "title": "About us",
            "meta": {"lang": "en", "words": 412}
        }),
    )
}

/// Two documents with differing shapes.
#[must_use]
pub fn sample_documents() -> Vec<AnalysisDocument> {
    vec![article_document(), plain_document()]
}

/// `count` result links on `site`.
#[must_use]
pub fn result_links(site: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("https://{site}/page-{i}")).collect()
}
