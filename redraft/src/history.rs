//! Append-only version history with revert-as-new-version.

use redraft_core::db;
use redraft_core::types::{Author, DocumentKey, DocumentRecord, Version};
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::error::EngineError;

/// The append-only per-document version store.
///
/// Wraps the shared database connection (a cheap clonable handle to the
/// single SQLite worker). Saves and reverts are atomic per document: the
/// version insert and the current-content update commit in one
/// `BEGIN IMMEDIATE` transaction, so a partially written version is never
/// visible and two saves on the same document serialize — the later commit
/// wins the head (last-writer-wins, see DESIGN.md).
#[derive(Clone)]
pub struct VersionStore {
    conn: Connection,
}

impl VersionStore {
    /// Wraps an already opened connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) the database at `path` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the database cannot be opened or
    /// migrated.
    pub async fn open(path: &str) -> Result<Self, EngineError> {
        Ok(Self {
            conn: db::open_db(path).await?,
        })
    }

    /// The underlying connection, for callers that need raw storage access.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Loads the document for `key`, creating it on first open.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the lookup or creation fails.
    pub async fn open_document(&self, key: &DocumentKey) -> Result<DocumentRecord, EngineError> {
        Ok(db::open_or_create_document(&self.conn, key).await?)
    }

    /// Appends `doc.current_content` as a new version and returns it.
    ///
    /// The document value is synchronized with the stored row (`updated_at`
    /// follows the new version's timestamp). History is append-only: existing
    /// versions are never touched.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the save transaction fails; the
    /// document row is then unchanged.
    pub async fn save(
        &self,
        doc: &mut DocumentRecord,
        message: &str,
        author: Author,
    ) -> Result<Version, EngineError> {
        let version = db::insert_version(
            &self.conn,
            &doc.key,
            doc.current_content.clone(),
            message,
            author,
        )
        .await?;
        doc.updated_at = version.created_at;
        debug!(
            filename = %doc.key.filename,
            version = %version.id,
            seq = version.seq,
            "version saved"
        );
        Ok(version)
    }

    /// Lists all versions for `key`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the query fails.
    pub async fn list(&self, key: &DocumentKey) -> Result<Vec<Version>, EngineError> {
        Ok(db::list_versions(&self.conn, key).await?)
    }

    /// Restores the content of the named historical version by saving it as
    /// a *new* head version with an auto-generated message. History is never
    /// truncated or rewritten — the version count strictly increases.
    ///
    /// Reverts are user-initiated, so the new version is authored `Human`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::VersionNotFound` if `version_id` does not exist
    /// for this document, `EngineError::Storage` on database failure.
    pub async fn revert(
        &self,
        doc: &mut DocumentRecord,
        version_id: &str,
    ) -> Result<Version, EngineError> {
        let target = db::get_version(&self.conn, &doc.key, version_id)
            .await?
            .ok_or_else(|| EngineError::VersionNotFound {
                version_id: version_id.to_owned(),
            })?;

        doc.current_content = target.content;
        let message = format!("Restored version {} (seq {})", target.id, target.seq);
        let version = self.save(doc, &message, Author::Human).await?;
        info!(
            filename = %doc.key.filename,
            restored = %target.id,
            new_head = %version.id,
            "document reverted"
        );
        Ok(version)
    }

    /// Writes the externally managed queue status, keeping the in-memory
    /// document in step. Passthrough only — the engine never interprets it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the update fails (including a value
    /// outside the schema's allowed set).
    pub async fn set_queue_status(
        &self,
        doc: &mut DocumentRecord,
        status: &str,
    ) -> Result<(), EngineError> {
        db::set_queue_status(&self.conn, &doc.key, status).await?;
        doc.queue_status = status.to_owned();
        Ok(())
    }
}
