//! The drafting-capability boundary.
//!
//! The engine consumes an opaque, possibly slow, possibly failing remote
//! service that turns an instruction into proposed document content. It is
//! modeled as the [`DraftProvider`] trait: one call yields one final
//! `{updated_content, explanation}` — incremental token streaming is a
//! presentation concern layered outside this crate. The engine never retries
//! a failed call; retry is a caller decision.

use thiserror::Error;

/// A highlighted sub-range of a document that an instruction applies to.
///
/// Passed through to the provider unchanged. The returned edit still carries
/// full-document content — selection scoping only narrows the instruction's
/// context, never the response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    /// First selected line, 1-based inclusive.
    pub start_line: u32,
    /// Last selected line, 1-based inclusive.
    pub end_line: u32,
}

/// One drafted edit returned by the provider.
#[derive(Debug, Clone)]
pub struct DraftedEdit {
    /// The full proposed document content.
    pub updated_content: String,
    /// Provider-written summary of what changed and why.
    pub explanation: String,
    /// Optional provider-side display hints. Stored and surfaced verbatim;
    /// the engine computes its own diff and never trusts these.
    pub diff_hints: Vec<String>,
}

/// One document in a generated plan.
#[derive(Debug, Clone)]
pub struct PlannedDocument {
    pub filename: String,
    pub summary: String,
}

/// A drafting plan derived from a conversation transcript.
#[derive(Debug, Clone)]
pub struct DraftedPlan {
    pub title: String,
    pub summary: String,
    pub documents: Vec<PlannedDocument>,
    /// Provider-estimated complexity label, stored verbatim.
    pub complexity: String,
    /// Filenames in the order the provider suggests drafting them.
    pub suggested_order: Vec<String>,
}

/// Failure reported by a drafting provider.
///
/// Providers collapse transport errors, upstream refusals, and timeouts into
/// one reason string; the engine maps any of them to
/// [`crate::error::EngineError::GenerationFailed`].
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct DraftError {
    pub reason: String,
}

impl DraftError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// The text-generation capability consumed by the engine.
///
/// `async fn` in trait is fine here: the engine drives provider futures on a
/// single task (including batch fan-out via `join_all`), so no `Send` bound
/// is imposed on implementors.
#[allow(async_fn_in_trait)]
pub trait DraftProvider {
    /// Drafts new full-document content for `instruction` applied to
    /// `current`. `selection` narrows the instruction to a highlighted range.
    ///
    /// Cancellation contract: callers may drop the returned future at any
    /// time; the engine performs no state mutation until it resolves, so a
    /// dropped call is equivalent to never having been made.
    async fn generate_edit(
        &self,
        current: &str,
        instruction: &str,
        selection: Option<SelectionRange>,
    ) -> Result<DraftedEdit, DraftError>;

    /// Derives a multi-document drafting plan from a conversation transcript.
    async fn generate_plan(&self, transcript: &str) -> Result<DraftedPlan, DraftError>;
}
