use localsearch::document::Document;
use localsearch::error::{LocalSearchError, Result};
use localsearch::query::SearchSpec;
use localsearch::schema::{FieldDefinition, IndexingMode, Schema};
use localsearch::session::{SearchSession, SessionConfig};

fn note_schema() -> Result<Schema> {
    Schema::builder("Note")
        .add_field(FieldDefinition::string("text").indexing(IndexingMode::Prefix))?
        .build()
}

fn note(id: &str, text: &str) -> Document {
    Document::builder("user1", id, "Note")
        .add_text("text", text)
        .build()
}

async fn open_session() -> Result<SearchSession> {
    let session = SearchSession::open(SessionConfig::new("notes_app")).await?;
    session.register_schema(note_schema()?).await?;
    Ok(session)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_puts_are_both_visible() -> Result<()> {
    let session = open_session().await?;

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.put(note("a", "fresh fruit")).await })
    };
    let second = {
        let session = session.clone();
        tokio::spawn(async move { session.put(note("b", "fresh bread")).await })
    };
    for handle in [first, second] {
        let prior = handle
            .await
            .map_err(|e| LocalSearchError::internal(e.to_string()))??;
        assert!(prior.is_none());
    }

    assert!(session.get_by_id("user1", "a").await?.is_some());
    assert!(session.get_by_id("user1", "b").await?.is_some());
    let page = session.search("fresh", SearchSpec::new())?.next_page().await?;
    assert_eq!(page.len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_writers_one_key() -> Result<()> {
    let session = open_session().await?;

    let mut handles = Vec::new();
    for i in 0..16 {
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            session.put(note("shared", &format!("version{i}"))).await
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| LocalSearchError::internal(e.to_string()))??;
    }

    // Exactly one version survives and only its terms are indexed.
    let info = session.storage_info().await?;
    assert_eq!(info.document_count, 1);
    assert_eq!(info.posting_count, 1);
    let page = session.search("version", SearchSpec::new())?.next_page().await?;
    assert_eq!(page.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_during_writes() -> Result<()> {
    let session = open_session().await?;
    session.put(note("seed", "fruit")).await?;

    let writer = {
        let session = session.clone();
        tokio::spawn(async move {
            for i in 0..50 {
                session.put(note(&format!("n{i}"), "fruit")).await?;
            }
            Ok::<_, LocalSearchError>(())
        })
    };

    let mut last = 0;
    for _ in 0..20 {
        let mut results = session.search("fruit", SearchSpec::new().result_count_per_page(100))?;
        let hits = results.next_page().await?.len();
        assert!(hits >= last, "result set shrank from {last} to {hits}");
        last = hits;
    }

    writer
        .await
        .map_err(|e| LocalSearchError::internal(e.to_string()))??;
    assert_eq!(session.storage_info().await?.document_count, 51);
    Ok(())
}

#[test]
fn test_closed_session_rejects_operations() {
    tokio_test::block_on(async {
        let session = open_session().await.unwrap();
        let other = session.clone();
        session.put(note("a", "fruit")).await.unwrap();
        let mut pending = session.search("fruit", SearchSpec::new()).unwrap();

        session.close().await.unwrap();
        assert!(other.is_closed());
        session.close().await.unwrap();

        assert!(matches!(
            other.put(note("b", "fruit")).await,
            Err(LocalSearchError::SessionClosed)
        ));
        assert!(matches!(
            other.get_by_id("user1", "a").await,
            Err(LocalSearchError::SessionClosed)
        ));
        assert!(matches!(
            other.search("fruit", SearchSpec::new()),
            Err(LocalSearchError::SessionClosed)
        ));
        assert!(matches!(
            pending.next_page().await,
            Err(LocalSearchError::SessionClosed)
        ));
    });
}
