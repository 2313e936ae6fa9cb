use thiserror::Error;

/// Every way a revision-engine operation can fail.
///
/// All failures are local to the operation that raised them: a failed propose
/// never rolls back prior saves, and a failed document in a batch never
/// invalidates the other documents' results. There is no fatal variant — the
/// document is always left at its last-known-good state.
///
/// An empty diff ("no changes detected") is deliberately *not* here: it is a
/// successful no-op, surfaced as [`crate::suggest::ProposeOutcome::NoChanges`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// The drafting capability was unreachable, errored, or returned empty
    /// content. The document is untouched; retrying is the caller's decision.
    #[error("draft generation failed: {reason}")]
    GenerationFailed { reason: String },

    /// A propose was attempted while another suggestion is pending for the
    /// same document. Suggestions are never silently merged; use the explicit
    /// repropose path to replace the pending one.
    #[error("a suggestion is already pending for this document")]
    SuggestionAlreadyPending,

    /// A revert referenced a version id that does not exist for the document.
    #[error("version {version_id} not found for this document")]
    VersionNotFound { version_id: String },

    /// The storage layer failed. Save/revert transactions are atomic, so a
    /// storage failure never leaves a partially written version visible.
    #[error("storage error: {0}")]
    Storage(#[from] tokio_rusqlite::Error),
}
