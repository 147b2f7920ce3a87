//! A small notes application on top of localsearch.
//!
//! Run with `RUST_LOG=debug cargo run --example notes_app` to see the
//! session's WAL and checkpoint activity.

use anyhow::Result;
use localsearch::prelude::*;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let root = std::env::temp_dir().join("localsearch-demo");
    let session = SearchSession::open(SessionConfig::new("notes_app").root_dir(&root)).await?;

    let schema = Schema::builder("Note")
        .add_field(FieldDefinition::string("text").indexing(IndexingMode::Prefix))?
        .build()?;
    session.register_schema(schema).await?;

    let note = Document::builder("user1", "noteId", "Note")
        .score(10)
        .add_text("text", "Buy fresh テスト 漢字 ひらがな fruit")
        .build();
    session.put(note).await?;

    if let Some(note) = session.get_by_id("user1", "noteId").await? {
        println!(
            "fetched {}: {}",
            note.key(),
            note.get_text("text").unwrap_or_default()
        );
    }

    for query in ["fresh", "fruit", "テスト", "漢字", "ひらがな"] {
        let spec = SearchSpec::new().add_namespace("user1");
        let mut results = session.search(query, spec)?;
        let page = results.next_page().await?;
        println!("{query}: {} result(s)", page.len());
        for hit in page {
            println!(
                "  {} (score {}, fields {:?})",
                hit.document.key(),
                hit.ranking_signal,
                hit.matched_fields
            );
        }
    }

    let info = session.storage_info().await?;
    info!(
        "{} document(s), {} term(s), {} WAL record(s)",
        info.document_count, info.term_count, info.wal_records
    );

    session.close().await?;
    println!("database stored under {}", root.display());
    Ok(())
}
