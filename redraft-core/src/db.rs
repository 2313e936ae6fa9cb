use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::types::{Author, DocumentKey, DocumentRecord, Version};

/// Opens (or creates) the SQLite database at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// This function is the single entry point for all database connections.
/// It sets `busy_timeout` via the `Connection` method (not a PRAGMA string) to
/// ensure the setting takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL configuration
/// fails, or schema DDL fails.
pub async fn open_db(path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    // Step 1: WAL pragmas — connection-level settings re-applied on every open.
    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;",
        )?;
        // busy_timeout via Connection method (not PRAGMA string).
        db.busy_timeout(Duration::from_secs(5))?;
        Ok(())
    })
    .await?;

    // Step 2: Checkpoint any leftover WAL from a previous run.
    conn.call(|db| {
        db.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    })
    .await?;

    // Step 3: Apply schema migrations via the schema_version versioning system.
    conn.call(|db| {
        crate::schema::migrate(db)?;
        Ok(())
    })
    .await?;

    Ok(conn)
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

fn document_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        key: DocumentKey {
            instance_id: r.get(0)?,
            filename: r.get(1)?,
        },
        current_content: r.get(2)?,
        queue_status: r.get(3)?,
        created_at: r.get(4)?,
        updated_at: r.get(5)?,
    })
}

fn version_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Version> {
    let author: String = r.get(4)?;
    Ok(Version {
        id: r.get(0)?,
        seq: r.get(1)?,
        content: r.get(2)?,
        message: r.get(3)?,
        author: Author::from_db(&author),
        created_at: r.get(5)?,
    })
}

/// Loads the document row for `key`, or `None` if it has never been created.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn load_document(
    conn: &Connection,
    key: &DocumentKey,
) -> Result<Option<DocumentRecord>, tokio_rusqlite::Error> {
    let key = key.clone();

    conn.call(move |db| {
        let doc = db
            .query_row(
                "SELECT instance_id, filename, current_content, queue_status,
                        created_at, updated_at
                 FROM documents
                 WHERE instance_id = ?1 AND filename = ?2",
                rusqlite::params![&key.instance_id, &key.filename],
                document_from_row,
            )
            .optional()?;
        Ok(doc)
    })
    .await
}

/// Loads the document row for `key`, creating it with empty content and
/// `pending` queue status on first open.
///
/// Creation runs inside `BEGIN IMMEDIATE`. Called when a file is first
/// opened in an editing session and when a generated plan is materialized.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query or write transaction fails.
pub async fn open_or_create_document(
    conn: &Connection,
    key: &DocumentKey,
) -> Result<DocumentRecord, tokio_rusqlite::Error> {
    if let Some(doc) = load_document(conn, key).await? {
        return Ok(doc);
    }

    let key = key.clone();
    conn.call(move |db| {
        let now = now_secs();
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        // A racing creator may have inserted the row since the lookup above;
        // OR IGNORE keeps the first writer's row.
        tx.execute(
            "INSERT OR IGNORE INTO documents
                 (instance_id, filename, current_content, queue_status, created_at, updated_at)
             VALUES (?1, ?2, '', 'pending', ?3, ?3)",
            rusqlite::params![&key.instance_id, &key.filename, now],
        )?;
        let doc = tx.query_row(
            "SELECT instance_id, filename, current_content, queue_status,
                    created_at, updated_at
             FROM documents
             WHERE instance_id = ?1 AND filename = ?2",
            rusqlite::params![&key.instance_id, &key.filename],
            document_from_row,
        )?;
        tx.commit()?;
        Ok(doc)
    })
    .await
}

/// Appends a new version for `key` and updates the document's current content,
/// in one `BEGIN IMMEDIATE` transaction.
///
/// The version's `seq` is assigned as `MAX(seq) + 1` for the document inside
/// the same transaction, so concurrent saves serialize and ordering stays
/// strict. The document row must already exist.
///
/// Returns the new `Version`.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the transaction fails (including when
/// the document row does not exist — the version insert then violates the
/// foreign key).
pub async fn insert_version(
    conn: &Connection,
    key: &DocumentKey,
    content: String,
    message: &str,
    author: Author,
) -> Result<Version, tokio_rusqlite::Error> {
    let key = key.clone();
    let message = message.to_owned();

    conn.call(move |db| {
        let id = uuid::Uuid::new_v4().to_string();
        let now = now_secs();
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM versions
             WHERE instance_id = ?1 AND filename = ?2",
            rusqlite::params![&key.instance_id, &key.filename],
            |r| r.get(0),
        )?;
        tx.execute(
            "INSERT INTO versions
                 (id, instance_id, filename, seq, content, message, author, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                &id,
                &key.instance_id,
                &key.filename,
                seq,
                &content,
                &message,
                author.as_str(),
                now
            ],
        )?;
        tx.execute(
            "UPDATE documents SET current_content = ?1, updated_at = ?2
             WHERE instance_id = ?3 AND filename = ?4",
            rusqlite::params![&content, now, &key.instance_id, &key.filename],
        )?;
        tx.commit()?;

        Ok(Version {
            id,
            seq,
            content,
            message,
            author,
            created_at: now,
        })
    })
    .await
}

/// Lists all versions for `key`, newest first (`ORDER BY seq DESC`).
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn list_versions(
    conn: &Connection,
    key: &DocumentKey,
) -> Result<Vec<Version>, tokio_rusqlite::Error> {
    let key = key.clone();

    conn.call(move |db| {
        let mut stmt = db.prepare(
            "SELECT id, seq, content, message, author, created_at
             FROM versions
             WHERE instance_id = ?1 AND filename = ?2
             ORDER BY seq DESC",
        )?;
        let rows = stmt
            .query_map(
                rusqlite::params![&key.instance_id, &key.filename],
                version_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    })
    .await
}

/// Loads one version of `key` by id, or `None` if the id does not exist for
/// that document. An id belonging to a different document is also `None`.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn get_version(
    conn: &Connection,
    key: &DocumentKey,
    version_id: &str,
) -> Result<Option<Version>, tokio_rusqlite::Error> {
    let key = key.clone();
    let version_id = version_id.to_owned();

    conn.call(move |db| {
        let version = db
            .query_row(
                "SELECT id, seq, content, message, author, created_at
                 FROM versions
                 WHERE id = ?1 AND instance_id = ?2 AND filename = ?3",
                rusqlite::params![&version_id, &key.instance_id, &key.filename],
                version_from_row,
            )
            .optional()?;
        Ok(version)
    })
    .await
}

/// Writes the externally managed queue status for `key`.
///
/// The status is a passthrough for outside schedulers; the engine stores it
/// verbatim and never branches on it. Values outside the schema CHECK
/// constraint are rejected by SQLite.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the `BEGIN IMMEDIATE` transaction fails.
pub async fn set_queue_status(
    conn: &Connection,
    key: &DocumentKey,
    status: &str,
) -> Result<(), tokio_rusqlite::Error> {
    let key = key.clone();
    let status = status.to_owned();

    conn.call(move |db| {
        let now = now_secs();
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "UPDATE documents SET queue_status = ?1, updated_at = ?2
             WHERE instance_id = ?3 AND filename = ?4",
            rusqlite::params![&status, now, &key.instance_id, &key.filename],
        )?;
        tx.commit()?;
        Ok(())
    })
    .await
}
