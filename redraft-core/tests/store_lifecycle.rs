//! Integration test for the document/version store lifecycle.
//!
//! Exercises: open_db, migrate, open_or_create_document, load_document,
//! insert_version, list_versions, get_version, set_queue_status.

use redraft_core::db;
use redraft_core::types::{Author, DocumentKey};

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("test.db");
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn full_store_lifecycle() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();

    // Verify schema_version = 1
    let version: i64 = conn
        .call(|db| {
            let v = db.query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))?;
            Ok::<_, rusqlite::Error>(v)
        })
        .await
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    // Verify WAL mode
    let journal: String = conn
        .call(|db| {
            let mode = db.query_row("PRAGMA journal_mode", [], |r| r.get(0))?;
            Ok::<_, rusqlite::Error>(mode)
        })
        .await
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    // Verify documents composite PK
    let doc_pk_count: i64 = conn
        .call(|db| {
            let count = db.query_row(
                "SELECT COUNT(*) FROM pragma_table_info('documents') WHERE pk > 0",
                [],
                |r| r.get(0),
            )?;
            Ok::<_, rusqlite::Error>(count)
        })
        .await
        .unwrap();
    assert_eq!(doc_pk_count, 2, "documents should have composite PK");

    // Verify versions table has TEXT primary key
    let version_pk_type: String = conn
        .call(|db| {
            let ty = db.query_row(
                "SELECT type FROM pragma_table_info('versions') WHERE name = 'id'",
                [],
                |r| r.get(0),
            )?;
            Ok::<_, rusqlite::Error>(ty)
        })
        .await
        .unwrap();
    assert_eq!(version_pk_type, "TEXT", "versions.id should be TEXT");

    let key = DocumentKey::new("instance-1", "spec.md");

    // Unknown documents load as None.
    assert!(db::load_document(&conn, &key).await.unwrap().is_none());

    // First open creates the row: empty content, pending status.
    let doc = db::open_or_create_document(&conn, &key).await.unwrap();
    assert_eq!(doc.current_content, "");
    assert_eq!(doc.queue_status, "pending");

    // Reopening returns the same row, not a duplicate.
    let again = db::open_or_create_document(&conn, &key).await.unwrap();
    assert_eq!(again.created_at, doc.created_at);

    // Save two versions; seq must be strict and content must follow.
    let v1 = db::insert_version(&conn, &key, "draft one\n".into(), "initial", Author::Human)
        .await
        .unwrap();
    let v2 = db::insert_version(&conn, &key, "draft two\n".into(), "edited", Author::Assistant)
        .await
        .unwrap();
    assert!(!v1.id.is_empty(), "version ID should be non-empty UUID");
    assert_ne!(v1.id, v2.id);
    assert_eq!(v1.seq, 1);
    assert_eq!(v2.seq, 2);

    // Document row reflects the latest save.
    let doc = db::load_document(&conn, &key).await.unwrap().unwrap();
    assert_eq!(doc.current_content, "draft two\n");

    // Listing is newest-first.
    let listed = db::list_versions(&conn, &key).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, v2.id);
    assert_eq!(listed[1].id, v1.id);
    assert_eq!(listed[0].author, Author::Assistant);
    assert_eq!(listed[1].message, "initial");

    // Point lookup by id, scoped to the document.
    let fetched = db::get_version(&conn, &key, &v1.id).await.unwrap().unwrap();
    assert_eq!(fetched.content, "draft one\n");
    let other_key = DocumentKey::new("instance-1", "other.md");
    db::open_or_create_document(&conn, &other_key).await.unwrap();
    assert!(
        db::get_version(&conn, &other_key, &v1.id).await.unwrap().is_none(),
        "a version id must not resolve under a different document"
    );

    // Queue status round-trips unchanged.
    db::set_queue_status(&conn, &key, "in_progress").await.unwrap();
    let doc = db::load_document(&conn, &key).await.unwrap().unwrap();
    assert_eq!(doc.queue_status, "in_progress");

    // Verify persistence: open a second connection to the same DB.
    let conn2 = db::open_db(&path).await.unwrap();
    let listed2 = db::list_versions(&conn2, &key).await.unwrap();
    assert_eq!(listed2.len(), 2, "versions should persist across connections");
    let doc2 = db::load_document(&conn2, &key).await.unwrap().unwrap();
    assert_eq!(doc2.current_content, "draft two\n");
}

#[tokio::test]
async fn versions_are_isolated_per_document() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();

    let key_a = DocumentKey::new("instance-1", "a.md");
    let key_b = DocumentKey::new("instance-1", "b.md");
    db::open_or_create_document(&conn, &key_a).await.unwrap();
    db::open_or_create_document(&conn, &key_b).await.unwrap();

    db::insert_version(&conn, &key_a, "a1\n".into(), "", Author::Human)
        .await
        .unwrap();
    db::insert_version(&conn, &key_a, "a2\n".into(), "", Author::Human)
        .await
        .unwrap();
    let b1 = db::insert_version(&conn, &key_b, "b1\n".into(), "", Author::Human)
        .await
        .unwrap();

    // Sequence counters are per-document, not global.
    assert_eq!(b1.seq, 1);
    assert_eq!(db::list_versions(&conn, &key_a).await.unwrap().len(), 2);
    assert_eq!(db::list_versions(&conn, &key_b).await.unwrap().len(), 1);

    // b's content is untouched by a's saves.
    let doc_b = db::load_document(&conn, &key_b).await.unwrap().unwrap();
    assert_eq!(doc_b.current_content, "b1\n");
}

#[tokio::test]
async fn invalid_queue_status_is_rejected() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();

    let key = DocumentKey::new("instance-1", "doc.md");
    db::open_or_create_document(&conn, &key).await.unwrap();

    let result = db::set_queue_status(&conn, &key, "paused").await;
    assert!(result.is_err(), "CHECK constraint should reject unknown status");

    // The row is unchanged after the failed write.
    let doc = db::load_document(&conn, &key).await.unwrap().unwrap();
    assert_eq!(doc.queue_status, "pending");
}
