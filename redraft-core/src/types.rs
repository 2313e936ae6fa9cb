/// Identity of a document: which app instance it belongs to plus its filename.
///
/// Both halves together form the composite primary key of the `documents`
/// table; versions reference the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub instance_id: String,
    pub filename: String,
}

impl DocumentKey {
    pub fn new(instance_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            filename: filename.into(),
        }
    }
}

/// A document row: current content plus the external scheduling status.
///
/// `queue_status` is one of `pending`, `in_progress`, `completed`. It is
/// written by external schedulers and stored/exposed unchanged — nothing in
/// this workspace interprets it.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub key: DocumentKey,
    pub current_content: String,
    pub queue_status: String,
    pub created_at: i64,      // Unix timestamp seconds
    pub updated_at: i64,      // Unix timestamp seconds
}

/// Who authored a saved version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    Human,
    Assistant,
}

impl Author {
    /// The TEXT value stored in the `versions.author` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Author::Human => "human",
            Author::Assistant => "assistant",
        }
    }

    /// Maps a stored column value back to an `Author`.
    ///
    /// The schema CHECK constraint admits only the two known values; anything
    /// else (hand-edited DB) is read back as `Human`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "assistant" => Author::Assistant,
            _ => Author::Human,
        }
    }
}

/// An immutable snapshot of a document's content.
///
/// Keyed by UUID v4 text. `seq` is a per-document strictly increasing
/// integer assigned inside the save transaction — it carries the ordering
/// guarantee, so two saves within the same wall-clock second still order
/// strictly. `created_at` is display-only. Rows are only ever appended.
#[derive(Debug, Clone)]
pub struct Version {
    pub id: String,           // UUID v4 text
    pub seq: i64,
    pub content: String,
    pub message: String,
    pub author: Author,
    pub created_at: i64,      // Unix timestamp seconds
}
