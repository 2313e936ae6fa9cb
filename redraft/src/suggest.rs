//! The pending-suggestion value and propose outcomes.

use std::time::{SystemTime, UNIX_EPOCH};

use redraft_diff::DiffLine;

use crate::draft::DraftedEdit;

/// Returns the current Unix timestamp in seconds.
pub(crate) fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// One AI-proposed edit awaiting accept / reject / refine.
///
/// `original_content` is pinned at creation and survives the whole refine
/// chain, so the diff always shows the cumulative change from the true
/// starting point. `suggested_content` is replaced on each refine. At most
/// one suggestion is pending per document at a time — enforced by
/// [`crate::session::EditSession`], the only place suggestions are installed.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub id: String,           // UUID v4 text
    /// The instruction that produced this suggestion (the latest one, for a
    /// refined suggestion).
    pub command: String,
    pub original_content: String,
    pub suggested_content: String,
    pub explanation: String,
    /// Line diff from `original_content` to `suggested_content`.
    pub diff: Vec<DiffLine>,
    pub created_at: i64,      // Unix timestamp seconds
}

impl Suggestion {
    /// Builds a suggestion from a drafted edit, diffing the draft against
    /// `original` (the pre-suggestion content, not any intermediate draft).
    pub(crate) fn from_draft(
        command: &str,
        original: String,
        edit: DraftedEdit,
        max_diff_cells: usize,
    ) -> Self {
        let diff = redraft_diff::diff_with_limit(&original, &edit.updated_content, max_diff_cells);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            command: command.to_owned(),
            original_content: original,
            suggested_content: edit.updated_content,
            explanation: edit.explanation,
            diff,
            created_at: now_secs(),
        }
    }
}

/// Result of a successful propose or refine.
///
/// `NoChanges` is the distinct-but-successful no-op: the drafted content was
/// identical to the comparison base, so nothing was installed as pending.
#[derive(Debug, Clone)]
pub enum ProposeOutcome {
    /// A suggestion is now pending on the session.
    Suggested(Suggestion),
    /// The draft produced no change; the session is exactly as it was.
    NoChanges { explanation: String },
}

impl ProposeOutcome {
    /// The pending suggestion, if one was installed.
    pub fn suggestion(&self) -> Option<&Suggestion> {
        match self {
            ProposeOutcome::Suggested(s) => Some(s),
            ProposeOutcome::NoChanges { .. } => None,
        }
    }
}
