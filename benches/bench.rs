//! Criterion benchmarks for localsearch.
//!
//! Covers text analysis, indexing through the session core, and prefix
//! search over a populated index.

use std::hint::black_box;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use localsearch::analysis::{Analyzer, StandardAnalyzer};
use localsearch::document::Document;
use localsearch::index::InvertedIndex;
use localsearch::query::SearchSpec;
use localsearch::schema::{FieldDefinition, IndexingMode, Schema};
use localsearch::session::{SessionConfig, SessionCore};

const WORDS: &[&str] = &[
    "search", "engine", "fresh", "fruit", "note", "grocery", "list", "meeting", "agenda",
    "project", "deadline", "recipe", "travel", "plan", "budget", "review", "テスト", "漢字",
    "ひらがな", "reminder",
];

/// Generate note texts with a deterministic word mix.
fn generate_texts(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let len = 8 + (i % 24);
            (0..len)
                .map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn note_schema() -> Schema {
    Schema::builder("Note")
        .add_field(FieldDefinition::string("text").indexing(IndexingMode::Prefix))
        .unwrap()
        .build()
        .unwrap()
}

fn notes(texts: &[String]) -> Vec<Document> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            Document::builder(format!("user{}", i % 4), format!("note{i}"), "Note")
                .score(i as u32)
                .add_text("text", text.as_str())
                .build()
        })
        .collect()
}

fn open_core(documents: Vec<Document>) -> SessionCore {
    let core = SessionCore::open(SessionConfig::new("bench")).unwrap();
    core.register_schema(note_schema()).unwrap();
    for document in documents {
        core.put(document).unwrap();
    }
    core
}

fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = StandardAnalyzer::new();
    let texts = generate_texts(1000);

    group.bench_function("analyze_single_text", |b| {
        b.iter(|| {
            let tokens: Vec<_> = analyzer.analyze(black_box(&texts[0])).unwrap().collect();
            black_box(tokens)
        })
    });

    group.throughput(Throughput::Elements(100));
    group.bench_function("analyze_batch_texts", |b| {
        b.iter(|| {
            for text in texts.iter().take(100) {
                let count = analyzer.analyze(black_box(text)).unwrap().count();
                black_box(count);
            }
        })
    });

    group.finish();
}

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    group.sample_size(20);

    let schema = note_schema();
    let documents = notes(&generate_texts(1000));

    group.throughput(Throughput::Elements(documents.len() as u64));
    group.bench_function("inverted_index_build", |b| {
        b.iter_batched(
            InvertedIndex::new,
            |mut index| {
                for document in &documents {
                    index.index(document, &schema).unwrap();
                }
                black_box(index.term_count())
            },
            BatchSize::LargeInput,
        )
    });

    group.throughput(Throughput::Elements(100));
    group.bench_function("session_put", |b| {
        b.iter_batched(
            || (open_core(Vec::new()), documents[..100].to_vec()),
            |(core, batch)| {
                for document in batch {
                    core.put(document).unwrap();
                }
                black_box(core)
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let core = open_core(notes(&generate_texts(5000)));

    for query in ["f", "fresh", "fresh fruit", "漢字"] {
        group.bench_function(format!("query_{query}"), |b| {
            b.iter(|| {
                let hits = core.search(black_box(query), &SearchSpec::new()).unwrap();
                black_box(hits.len())
            })
        });
    }

    group.bench_function("query_with_namespace_filter", |b| {
        let spec = SearchSpec::new().add_namespace("user1");
        b.iter(|| {
            let hits = core.search(black_box("fruit"), &spec).unwrap();
            black_box(hits.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_text_analysis, bench_indexing, bench_search);
criterion_main!(benches);
