//! Benchmarks for flattening and table construction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use siteprobe::document::AnalysisDocument;
use siteprobe::export::{flatten_document, ExportConfig, ExportLayout, Exporter};

fn wide_document(objects: usize) -> AnalysisDocument {
    let items: Vec<_> = (0..objects)
        .map(|i| {
            json!({
                "type": "article",
                "title": format!("Article {i}"),
                "tags": [{"label": "a", "score": 0.5}, {"label": "b", "score": 0.25}],
                "images": [{"url": format!("https://example.com/{i}.png"), "primary": i == 0}],
                "meta": {"lang": "en", "words": i * 10}
            })
        })
        .collect();
    AnalysisDocument::new("https://example.com", json!({"type": "list", "objects": items}))
}

fn flatten_benchmark(c: &mut Criterion) {
    let doc = wide_document(50);
    c.bench_function("flatten_document_50_objects", |b| {
        b.iter(|| black_box(flatten_document(black_box(&doc), "objects", "_")));
    });

    let docs: Vec<_> = (0..5).map(|_| wide_document(20)).collect();
    let exporter = Exporter::new(ExportConfig::new().with_layout(ExportLayout::Flattened));
    c.bench_function("flattened_table_5_documents", |b| {
        b.iter(|| black_box(exporter.build_table(black_box(&docs))));
    });
}

criterion_group!(benches, flatten_benchmark);
criterion_main!(benches);
