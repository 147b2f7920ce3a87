use localsearch::document::Document;
use localsearch::error::{LocalSearchError, Result};
use localsearch::query::{RankingStrategy, SearchSpec};
use localsearch::schema::{FieldDefinition, IndexingMode, Schema};
use localsearch::session::{SearchSession, SessionConfig};
use localsearch::store::DeleteOutcome;

fn note_schema() -> Result<Schema> {
    Schema::builder("Note")
        .add_field(FieldDefinition::string("text").indexing(IndexingMode::Prefix))?
        .build()
}

fn note(namespace: &str, id: &str, score: u32, text: &str) -> Document {
    Document::builder(namespace, id, "Note")
        .score(score)
        .add_text("text", text)
        .build()
}

async fn open_notes_app() -> Result<SearchSession> {
    let session = SearchSession::open(SessionConfig::new("notes_app")).await?;
    session.register_schema(note_schema()?).await?;
    Ok(session)
}

async fn search_ids(session: &SearchSession, query: &str, spec: SearchSpec) -> Result<Vec<String>> {
    let mut results = session.search(query, spec)?;
    let mut ids = Vec::new();
    loop {
        let page = results.next_page().await?;
        if page.is_empty() {
            break;
        }
        ids.extend(page.into_iter().map(|r| r.document.id().to_string()));
    }
    Ok(ids)
}

#[tokio::test]
async fn test_note_scenario() -> Result<()> {
    let session = open_notes_app().await?;
    session
        .put(note("user1", "noteId", 10, "Buy fresh fruit"))
        .await?;

    let spec = SearchSpec::new().add_namespace("user1");
    let page = session.search("fruit", spec)?.next_page().await?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].document.id(), "noteId");
    assert_eq!(page[0].document.score(), 10);
    assert_eq!(page[0].ranking_signal, 10);

    session.close().await
}

#[tokio::test]
async fn test_mixed_script_queries() -> Result<()> {
    let session = open_notes_app().await?;
    session
        .put(note("user1", "noteId", 10, "Buy fresh テスト 漢字 ひらがな fruit"))
        .await?;

    for query in ["fresh", "fruit", "テスト", "漢字", "ひらがな"] {
        let spec = SearchSpec::new().add_namespace("user1");
        let page = session.search(query, spec)?.next_page().await?;
        assert_eq!(page.len(), 1, "query {query:?}");
    }

    session.close().await
}

#[tokio::test]
async fn test_round_trip() -> Result<()> {
    let session = open_notes_app().await?;
    let original = Document::builder("user1", "noteId", "Note")
        .score(7)
        .creation_timestamp_millis(1_700_000_000_000)
        .add_text("text", "Ünïcödé, punctuation!")
        .build();
    session.put(original.clone()).await?;

    let fetched = session.get_by_id("user1", "noteId").await?;
    assert_eq!(fetched, Some(original));
    assert_eq!(session.get_by_id("user1", "missing").await?, None);
    assert_eq!(session.get_by_id("user2", "noteId").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_idempotent_delete() -> Result<()> {
    let session = open_notes_app().await?;

    let first = session.delete("user1", "ghost").await?;
    let second = session.delete("user1", "ghost").await?;
    assert_eq!(first, DeleteOutcome::Absent);
    assert_eq!(first, second);

    session.put(note("user1", "a", 0, "apple")).await?;
    assert_eq!(session.delete("user1", "a").await?, DeleteOutcome::Deleted);
    assert_eq!(session.delete("user1", "a").await?, DeleteOutcome::Absent);
    assert!(search_ids(&session, "apple", SearchSpec::new()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_retraction_completeness() -> Result<()> {
    let session = open_notes_app().await?;
    session.put(note("user1", "a", 0, "apple pie")).await?;

    let prior = session.put(note("user1", "a", 0, "banana bread")).await?;
    assert_eq!(
        prior.as_ref().and_then(|doc| doc.get_text("text")),
        Some("apple pie")
    );

    assert!(search_ids(&session, "apple", SearchSpec::new()).await?.is_empty());
    assert!(search_ids(&session, "pi", SearchSpec::new()).await?.is_empty());
    assert_eq!(
        search_ids(&session, "banana", SearchSpec::new()).await?,
        vec!["a"]
    );

    let info = session.storage_info().await?;
    assert_eq!(info.term_count, 2);
    assert_eq!(info.posting_count, 2);
    Ok(())
}

#[tokio::test]
async fn test_prefix_search() -> Result<()> {
    let session = open_notes_app().await?;
    session
        .put(note("user1", "noteId", 0, "Buy fresh fruit"))
        .await?;

    assert_eq!(
        search_ids(&session, "fr", SearchSpec::new()).await?,
        vec!["noteId"]
    );
    assert_eq!(
        search_ids(&session, "FRU", SearchSpec::new()).await?,
        vec!["noteId"]
    );
    assert!(search_ids(&session, "xyz", SearchSpec::new()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_score_ordering() -> Result<()> {
    let session = open_notes_app().await?;
    session.put(note("user1", "low", 1, "fresh fruit")).await?;
    session.put(note("user1", "high", 99, "fruit salad")).await?;

    assert_eq!(
        search_ids(&session, "fruit", SearchSpec::new()).await?,
        vec!["high", "low"]
    );

    let unranked = SearchSpec::new().ranking(RankingStrategy::None);
    assert_eq!(
        search_ids(&session, "fruit", unranked).await?,
        vec!["high", "low"]
    );
    Ok(())
}

#[tokio::test]
async fn test_namespace_isolation() -> Result<()> {
    let session = open_notes_app().await?;
    session.put(note("user1", "a", 0, "fruit")).await?;
    session.put(note("user2", "a", 0, "fruit")).await?;

    let spec = SearchSpec::new().add_namespace("user2");
    let page = session.search("fruit", spec)?.next_page().await?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].document.namespace(), "user2");

    assert_eq!(session.namespaces().await?, vec!["user1", "user2"]);
    Ok(())
}

#[tokio::test]
async fn test_pagination() -> Result<()> {
    let session = open_notes_app().await?;
    for i in 0..7u32 {
        session
            .put(note("user1", &format!("note{i}"), i, "fruit"))
            .await?;
    }

    let mut results = session.search("fruit", SearchSpec::new().result_count_per_page(3))?;
    let sizes = [
        results.next_page().await?.len(),
        results.next_page().await?.len(),
        results.next_page().await?.len(),
        results.next_page().await?.len(),
        results.next_page().await?.len(),
    ];
    assert_eq!(sizes, [3, 3, 1, 0, 0]);
    assert_eq!(results.total_hits(), Some(7));

    // A fresh search starts over.
    let first = session
        .search("fruit", SearchSpec::new().result_count_per_page(3))?
        .next_page()
        .await?;
    assert_eq!(first[0].document.id(), "note6");
    Ok(())
}

#[tokio::test]
async fn test_unbounded_page_size() -> Result<()> {
    let session = open_notes_app().await?;
    session.put(note("user1", "a", 0, "fruit")).await?;
    session.put(note("user1", "b", 0, "fruit")).await?;

    let mut results = session.search("fruit", SearchSpec::new().result_count_per_page(usize::MAX))?;
    assert_eq!(results.next_page().await?.len(), 2);
    assert!(results.next_page().await?.is_empty());
    assert!(results.next_page().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_pages_slice_one_result_set() -> Result<()> {
    let session = open_notes_app().await?;
    session.put(note("user1", "a", 2, "fruit")).await?;
    session.put(note("user1", "b", 1, "fruit")).await?;

    let mut results = session.search("fruit", SearchSpec::new().result_count_per_page(1))?;
    let first = results.next_page().await?;
    session.put(note("user1", "c", 5, "fruit")).await?;
    let second = results.next_page().await?;

    assert_eq!(first[0].document.id(), "a");
    assert_eq!(second[0].document.id(), "b");
    assert!(results.next_page().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_validation_errors() -> Result<()> {
    let session = open_notes_app().await?;

    let unknown_type = Document::builder("user1", "a", "Task").build();
    let err = session.put(unknown_type).await.unwrap_err();
    assert_eq!(err.field(), Some("schema"));

    let wrong_type = Document::builder("user1", "a", "Note")
        .add_integer("text", 3)
        .build();
    let err = session.put(wrong_type).await.unwrap_err();
    assert!(matches!(err, LocalSearchError::Validation { .. }));
    assert_eq!(err.field(), Some("text"));

    assert_eq!(session.storage_info().await?.document_count, 0);
    Ok(())
}

#[tokio::test]
async fn test_incompatible_schema_rejected() -> Result<()> {
    let session = open_notes_app().await?;
    let retyped = Schema::builder("Note")
        .add_field(FieldDefinition::integer("text"))?
        .build()?;

    let err = session.register_schema(retyped).await.unwrap_err();
    assert!(matches!(err, LocalSearchError::Schema(_)));
    assert_eq!(session.schemas().await?, vec![note_schema()?]);
    Ok(())
}

#[tokio::test]
async fn test_batch_operations() -> Result<()> {
    let session = open_notes_app().await?;
    let batch = session
        .put_documents(vec![
            note("user1", "a", 0, "fresh fruit"),
            note("user1", "b", 0, "fresh bread"),
            Document::builder("user1", "bad", "Note")
                .add_integer("text", 1)
                .build(),
        ])
        .await?;
    assert_eq!(batch.successes().len(), 2);
    assert_eq!(batch.failures().len(), 1);

    let fetched = session.get_by_ids("user1", ["a", "b", "bad"]).await?;
    assert_eq!(fetched.successes().len(), 2);
    assert!(fetched.failures().contains_key("bad"));

    let removed = session.remove_by_query("fresh", SearchSpec::new()).await?;
    assert_eq!(removed, 2);
    assert_eq!(session.storage_info().await?.document_count, 0);
    Ok(())
}

#[tokio::test]
async fn test_integer_field_search() -> Result<()> {
    let session = SearchSession::open(SessionConfig::new("tasks_app")).await?;
    let schema = Schema::builder("Task")
        .add_field(FieldDefinition::string("title").indexing(IndexingMode::Prefix))?
        .add_field(FieldDefinition::integer("offset").indexing(IndexingMode::Exact))?
        .build()?;
    session.register_schema(schema).await?;

    for (id, offset) in [("behind", -7), ("ahead", 7)] {
        session
            .put(
                Document::builder("user1", id, "Task")
                    .add_text("title", "sync clocks")
                    .add_integer("offset", offset)
                    .build(),
            )
            .await?;
    }

    assert_eq!(search_ids(&session, "-7", SearchSpec::new()).await?, vec!["behind"]);
    assert_eq!(search_ids(&session, "7", SearchSpec::new()).await?, vec!["ahead"]);
    assert_eq!(
        search_ids(&session, "sync 7", SearchSpec::new()).await?,
        vec!["ahead"]
    );
    Ok(())
}
