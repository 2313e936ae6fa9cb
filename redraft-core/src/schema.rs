/// DDL to create the schema_version tracking table.
///
/// Applied unconditionally on every DB open (before checking the version),
/// using `IF NOT EXISTS` so it is safe to run multiple times.
pub const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

/// DDL for the full v1 schema.
///
/// Contains two tables:
/// - `documents`: one row per (instance, filename) pair, holding the current
///   content and the externally managed queue status.
/// - `versions`: append-only content snapshots. `seq` is per-document and
///   strictly increasing (enforced by the UNIQUE constraint; assigned in the
///   save transaction). Rows are never updated or deleted by the engine.
///
/// All tables use `STRICT` mode for type enforcement.
/// The versions foreign key uses `ON DELETE CASCADE` so dropping a document
/// row cleans up its history.
pub const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS documents (
        instance_id     TEXT    NOT NULL,
        filename        TEXT    NOT NULL,
        current_content TEXT    NOT NULL DEFAULT '',
        queue_status    TEXT    NOT NULL DEFAULT 'pending'
                                CHECK(queue_status IN ('pending','in_progress','completed')),
        created_at      INTEGER NOT NULL,
        updated_at      INTEGER NOT NULL,
        PRIMARY KEY (instance_id, filename)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS versions (
        id          TEXT    PRIMARY KEY,
        instance_id TEXT    NOT NULL,
        filename    TEXT    NOT NULL,
        seq         INTEGER NOT NULL,
        content     TEXT    NOT NULL,
        message     TEXT    NOT NULL DEFAULT '',
        author      TEXT    NOT NULL
                            CHECK(author IN ('human','assistant')),
        created_at  INTEGER NOT NULL,
        FOREIGN KEY (instance_id, filename)
            REFERENCES documents(instance_id, filename) ON DELETE CASCADE,
        UNIQUE (instance_id, filename, seq)
    ) STRICT;

    CREATE INDEX IF NOT EXISTS versions_by_document
        ON versions (instance_id, filename, seq DESC);
";

/// Runs forward-only schema migration to migrate the DB to the latest version.
///
/// This function is idempotent: safe to call on every startup regardless of
/// whether the schema has already been applied.
///
/// # Process
///
/// 1. Creates the `schema_version` table if it does not exist.
/// 2. Reads the current version (`0` if the table is empty).
/// 3. If the version is below 1, applies `SCHEMA_V1_SQL` inside a
///    `BEGIN IMMEDIATE` transaction and records `version = 1`.
///
/// # Errors
///
/// Returns `rusqlite::Error` if the DDL fails or the version row cannot be read.
pub fn migrate(db: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    db.execute_batch(SCHEMA_VERSION_DDL)?;

    let version: i64 = db
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if version < 1 {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute_batch(SCHEMA_V1_SQL)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        tx.commit()?;
    }

    Ok(())
}
