//! Version store behavior through the engine API: save, list, revert, the
//! session-level wrappers, and plan materialization.

mod support;

use redraft::{
    register_plan, Author, DocumentKey, DraftedPlan, EditSession, EngineError, PlannedDocument,
    VersionStore,
};
use support::ScriptedProvider;

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("test.db");
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn save_appends_and_tracks_current_content() {
    let store = VersionStore::open(&temp_db_path()).await.unwrap();
    let key = DocumentKey::new("inst", "spec.md");
    let mut doc = store.open_document(&key).await.unwrap();

    doc.current_content = "first draft\n".to_owned();
    let v1 = store.save(&mut doc, "initial draft", Author::Human).await.unwrap();
    doc.current_content = "second draft\n".to_owned();
    let v2 = store.save(&mut doc, "rework", Author::Assistant).await.unwrap();

    // The stored row always equals the latest version after a save.
    let reloaded = store.open_document(&key).await.unwrap();
    assert_eq!(reloaded.current_content, "second draft\n");

    let listed = store.list(&key).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, v2.id, "newest first");
    assert_eq!(listed[1].id, v1.id);
    assert!(listed[0].seq > listed[1].seq, "ordering is strict");
}

#[tokio::test]
async fn revert_appends_a_new_head_and_never_mutates_history() {
    let store = VersionStore::open(&temp_db_path()).await.unwrap();
    let key = DocumentKey::new("inst", "spec.md");
    let mut doc = store.open_document(&key).await.unwrap();

    doc.current_content = "v1 content\n".to_owned();
    let v1 = store.save(&mut doc, "one", Author::Human).await.unwrap();
    doc.current_content = "v2 content\n".to_owned();
    let v2 = store.save(&mut doc, "two", Author::Human).await.unwrap();

    let before = store.list(&key).await.unwrap();
    let restored = store.revert(&mut doc, &v1.id).await.unwrap();

    // The version count strictly increased and the old rows are untouched.
    let after = store.list(&key).await.unwrap();
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(doc.current_content, "v1 content\n");
    assert_ne!(restored.id, v1.id, "revert creates a new version");
    assert_eq!(restored.author, Author::Human);
    assert!(restored.message.contains(&v1.id));

    let old_v1 = after.iter().find(|v| v.id == v1.id).unwrap();
    let old_v2 = after.iter().find(|v| v.id == v2.id).unwrap();
    assert_eq!(old_v1.content, "v1 content\n");
    assert_eq!(old_v2.content, "v2 content\n");

    // The new head is first in the newest-first listing.
    assert_eq!(after[0].id, restored.id);
}

#[tokio::test]
async fn revert_to_unknown_version_fails_cleanly() {
    let store = VersionStore::open(&temp_db_path()).await.unwrap();
    let key = DocumentKey::new("inst", "spec.md");
    let mut doc = store.open_document(&key).await.unwrap();
    doc.current_content = "content\n".to_owned();
    store.save(&mut doc, "one", Author::Human).await.unwrap();

    let err = store.revert(&mut doc, "no-such-id").await.unwrap_err();
    assert!(matches!(err, EngineError::VersionNotFound { .. }));
    // Last-known-good state: content and history are untouched.
    assert_eq!(doc.current_content, "content\n");
    assert_eq!(store.list(&key).await.unwrap().len(), 1);
}

#[tokio::test]
async fn session_revert_discards_the_pending_suggestion() {
    let store = VersionStore::open(&temp_db_path()).await.unwrap();
    let key = DocumentKey::new("inst", "spec.md");
    let mut doc = store.open_document(&key).await.unwrap();
    doc.current_content = "old content\n".to_owned();
    let v1 = store.save(&mut doc, "one", Author::Human).await.unwrap();
    doc.current_content = "new content\n".to_owned();
    store.save(&mut doc, "two", Author::Human).await.unwrap();

    let provider = ScriptedProvider::new();
    provider.push_edit("new content\nplus a suggestion\n", "drafted");
    let mut session = EditSession::new(doc);
    session.propose(&provider, "extend", None).await.unwrap();
    assert!(session.pending().is_some());

    session.revert(&store, &v1.id).await.unwrap();
    assert_eq!(session.document().current_content, "old content\n");
    assert!(
        session.pending().is_none(),
        "a suggestion drafted against vanished content must not survive a revert"
    );
}

#[tokio::test]
async fn session_save_persists_accepted_content() {
    let store = VersionStore::open(&temp_db_path()).await.unwrap();
    let key = DocumentKey::new("inst", "notes.md");
    let doc = store.open_document(&key).await.unwrap();

    let provider = ScriptedProvider::new();
    provider.push_edit("drafted body\n", "wrote the body");
    let mut session = EditSession::new(doc);
    session.propose(&provider, "write the body", None).await.unwrap();
    session.accept().unwrap();

    let version = session
        .save(&store, "write the body", Author::Assistant)
        .await
        .unwrap();
    assert_eq!(version.content, "drafted body\n");
    assert_eq!(version.author, Author::Assistant);

    let reloaded = store.open_document(&key).await.unwrap();
    assert_eq!(reloaded.current_content, "drafted body\n");
}

#[tokio::test]
async fn register_plan_creates_queued_documents_in_order() {
    let store = VersionStore::open(&temp_db_path()).await.unwrap();
    let plan = DraftedPlan {
        title: "Service design".to_owned(),
        summary: "three documents".to_owned(),
        documents: vec![
            PlannedDocument { filename: "api.md".into(), summary: "API sketch".into() },
            PlannedDocument { filename: "overview.md".into(), summary: "big picture".into() },
            PlannedDocument { filename: "rollout.md".into(), summary: "rollout".into() },
        ],
        complexity: "medium".to_owned(),
        // The provider orders two of the three; the leftover is appended.
        suggested_order: vec!["overview.md".to_owned(), "api.md".to_owned()],
    };

    let records = register_plan(&store, "inst", &plan).await.unwrap();
    let names: Vec<&str> = records.iter().map(|d| d.key.filename.as_str()).collect();
    assert_eq!(names, vec!["overview.md", "api.md", "rollout.md"]);
    for doc in &records {
        assert_eq!(doc.queue_status, "pending");
        assert_eq!(doc.current_content, "");
    }

    // Re-registering is harmless first-open semantics.
    let again = register_plan(&store, "inst", &plan).await.unwrap();
    assert_eq!(again.len(), 3);
    assert_eq!(again[0].created_at, records[0].created_at);
}
