//! The per-document editing session and its suggestion state machine.
//!
//! `EditSession` owns one document value plus all transient editing state:
//! the optional pending suggestion and the session-local undo stack. Every
//! workflow step is a discrete method call — propose, accept, reject, refine,
//! undo — with no presentation layer involved, so the whole lifecycle is
//! testable by constructing an isolated session.
//!
//! State mutation only ever happens *after* a provider call resolves.
//! Dropping an in-flight `propose`/`refine` future therefore leaves the
//! session exactly as if the call had never been made, which is the
//! cancellation contract for navigating away mid-generation.

use redraft_core::types::{Author, DocumentRecord, Version};
use redraft_diff::is_unchanged;
use tracing::debug;

use crate::config::EngineConfig;
use crate::draft::{DraftProvider, SelectionRange};
use crate::error::EngineError;
use crate::history::VersionStore;
use crate::suggest::{now_secs, ProposeOutcome, Suggestion};

/// What a raw user command resolved to.
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    /// The pending suggestion was accepted.
    Accepted,
    /// The pending suggestion was rejected.
    Rejected,
    /// The undo stack was popped.
    Undone,
    /// The text was treated as an instruction and drafted.
    Proposed(ProposeOutcome),
}

/// One editing session over one document.
///
/// Sessions are not shared or synchronized: the undo stack and pending
/// suggestion die with the session. Durable state lives in the version store.
pub struct EditSession {
    document: DocumentRecord,
    pending: Option<Suggestion>,
    undo_stack: Vec<String>,
    max_diff_cells: usize,
}

impl EditSession {
    /// Opens a session over `document` with default diff limits.
    pub fn new(document: DocumentRecord) -> Self {
        Self {
            document,
            pending: None,
            undo_stack: Vec::new(),
            max_diff_cells: redraft_diff::DEFAULT_MAX_CELLS,
        }
    }

    /// Opens a session using the diff size cap from `config`.
    pub fn with_config(document: DocumentRecord, config: &EngineConfig) -> Self {
        let mut session = Self::new(document);
        session.max_diff_cells = config.max_diff_cells;
        session
    }

    /// The document as this session currently sees it.
    pub fn document(&self) -> &DocumentRecord {
        &self.document
    }

    /// The pending suggestion, if any.
    pub fn pending(&self) -> Option<&Suggestion> {
        self.pending.as_ref()
    }

    /// How many undo steps are available.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Consumes the session, returning the document value.
    pub fn into_document(self) -> DocumentRecord {
        self.document
    }

    /// Drafts a suggestion for `instruction` against the current content.
    ///
    /// Fails with `SuggestionAlreadyPending` if a suggestion is already
    /// pending — suggestions are never merged. Fails with `GenerationFailed`
    /// if the provider errors or returns empty content; in both failure
    /// cases the session is untouched.
    ///
    /// Returns `NoChanges` (and installs nothing) when the draft is
    /// identical to the current content.
    pub async fn propose<P: DraftProvider>(
        &mut self,
        provider: &P,
        instruction: &str,
        selection: Option<SelectionRange>,
    ) -> Result<ProposeOutcome, EngineError> {
        if self.pending.is_some() {
            return Err(EngineError::SuggestionAlreadyPending);
        }
        self.draft_and_install(provider, instruction, selection).await
    }

    /// Like [`propose`](Self::propose), but explicitly discards any pending
    /// suggestion first. This is the only sanctioned way to replace a
    /// pending suggestion with a fresh (non-refine) one.
    pub async fn repropose<P: DraftProvider>(
        &mut self,
        provider: &P,
        instruction: &str,
        selection: Option<SelectionRange>,
    ) -> Result<ProposeOutcome, EngineError> {
        self.pending = None;
        self.draft_and_install(provider, instruction, selection).await
    }

    /// Installs an externally built suggestion (e.g. from a review-mode
    /// batch edit) as this session's pending suggestion.
    ///
    /// Fails with `SuggestionAlreadyPending` when one is already installed.
    pub fn adopt_suggestion(&mut self, suggestion: Suggestion) -> Result<(), EngineError> {
        if self.pending.is_some() {
            return Err(EngineError::SuggestionAlreadyPending);
        }
        self.pending = Some(suggestion);
        Ok(())
    }

    /// Accepts the pending suggestion: the prior content is pushed onto the
    /// undo stack and the suggested content becomes current.
    ///
    /// Returns `None` (and does nothing) when no suggestion is pending.
    /// Acceptance is in-memory only — persisting the new content as a
    /// version is a separate, explicit [`save`](Self::save).
    pub fn accept(&mut self) -> Option<&DocumentRecord> {
        let suggestion = self.pending.take()?;
        self.undo_stack
            .push(std::mem::replace(&mut self.document.current_content, suggestion.suggested_content));
        self.document.updated_at = now_secs();
        debug!(
            filename = %self.document.key.filename,
            suggestion = %suggestion.id,
            "suggestion accepted"
        );
        Some(&self.document)
    }

    /// Rejects the pending suggestion, leaving the document unchanged.
    ///
    /// Returns `true` if there was a suggestion to reject.
    pub fn reject(&mut self) -> bool {
        match self.pending.take() {
            Some(suggestion) => {
                debug!(
                    filename = %self.document.key.filename,
                    suggestion = %suggestion.id,
                    "suggestion rejected"
                );
                true
            }
            None => false,
        }
    }

    /// Refines the pending suggestion with a follow-up instruction.
    ///
    /// The provider drafts from the pending suggestion's content (so the
    /// follow-up builds on what the user is looking at), but the new
    /// suggestion is diffed against the chain's pinned `original_content`,
    /// so the user always sees the cumulative change from the true starting
    /// point. The new suggestion replaces the pending one.
    ///
    /// With nothing pending this behaves as a plain [`propose`](Self::propose).
    /// If the refined draft lands back on the original content, the existing
    /// pending suggestion is kept untouched and `NoChanges` is returned.
    pub async fn refine<P: DraftProvider>(
        &mut self,
        provider: &P,
        instruction: &str,
    ) -> Result<ProposeOutcome, EngineError> {
        let Some(pending) = &self.pending else {
            return self.draft_and_install(provider, instruction, None).await;
        };
        let base = pending.suggested_content.clone();
        let original = pending.original_content.clone();

        let edit = provider
            .generate_edit(&base, instruction, None)
            .await
            .map_err(|e| EngineError::GenerationFailed { reason: e.reason })?;
        if edit.updated_content.is_empty() {
            return Err(EngineError::GenerationFailed {
                reason: "drafting capability returned empty content".to_owned(),
            });
        }

        let suggestion =
            Suggestion::from_draft(instruction, original, edit, self.max_diff_cells);
        if is_unchanged(&suggestion.diff) {
            // The refinement undid the whole chain; keep the pending
            // suggestion as-is and report the no-op.
            return Ok(ProposeOutcome::NoChanges {
                explanation: suggestion.explanation,
            });
        }
        debug!(
            filename = %self.document.key.filename,
            suggestion = %suggestion.id,
            "suggestion refined"
        );
        self.pending = Some(suggestion.clone());
        Ok(ProposeOutcome::Suggested(suggestion))
    }

    /// Pops the undo stack, restoring the previous content.
    ///
    /// Returns `None` when the stack is empty. The undo stack is transient
    /// and session-local; it is never persisted.
    pub fn undo(&mut self) -> Option<&DocumentRecord> {
        let previous = self.undo_stack.pop()?;
        self.document.current_content = previous;
        self.document.updated_at = now_secs();
        Some(&self.document)
    }

    /// Interprets one raw user command, applying the textual shortcuts.
    ///
    /// Literal `yes` / `no` / `undo` map to accept / reject / undo — but only
    /// when a pending suggestion (resp. non-empty undo stack) exists;
    /// otherwise the text falls through and is treated as an instruction.
    /// Any other text proposes, or refines when a suggestion is pending.
    pub async fn apply_command<P: DraftProvider>(
        &mut self,
        provider: &P,
        raw: &str,
    ) -> Result<CommandOutcome, EngineError> {
        match raw.trim() {
            "yes" if self.pending.is_some() => {
                self.accept();
                Ok(CommandOutcome::Accepted)
            }
            "no" if self.pending.is_some() => {
                self.reject();
                Ok(CommandOutcome::Rejected)
            }
            "undo" if !self.undo_stack.is_empty() => {
                self.undo();
                Ok(CommandOutcome::Undone)
            }
            instruction => {
                let outcome = if self.pending.is_some() {
                    self.refine(provider, instruction).await?
                } else {
                    self.propose(provider, instruction, None).await?
                };
                Ok(CommandOutcome::Proposed(outcome))
            }
        }
    }

    /// Persists the current content as a new version through `store`.
    pub async fn save(
        &mut self,
        store: &VersionStore,
        message: &str,
        author: Author,
    ) -> Result<Version, EngineError> {
        store.save(&mut self.document, message, author).await
    }

    /// Reverts the document to a historical version through `store`.
    ///
    /// Any pending suggestion is discarded first: it was drafted against
    /// content that no longer exists.
    pub async fn revert(
        &mut self,
        store: &VersionStore,
        version_id: &str,
    ) -> Result<Version, EngineError> {
        let version = store.revert(&mut self.document, version_id).await?;
        self.pending = None;
        Ok(version)
    }

    /// Shared propose path: draft, validate, diff, install.
    async fn draft_and_install<P: DraftProvider>(
        &mut self,
        provider: &P,
        instruction: &str,
        selection: Option<SelectionRange>,
    ) -> Result<ProposeOutcome, EngineError> {
        let edit = provider
            .generate_edit(&self.document.current_content, instruction, selection)
            .await
            .map_err(|e| EngineError::GenerationFailed { reason: e.reason })?;
        if edit.updated_content.is_empty() {
            return Err(EngineError::GenerationFailed {
                reason: "drafting capability returned empty content".to_owned(),
            });
        }

        let suggestion = Suggestion::from_draft(
            instruction,
            self.document.current_content.clone(),
            edit,
            self.max_diff_cells,
        );
        if is_unchanged(&suggestion.diff) {
            return Ok(ProposeOutcome::NoChanges {
                explanation: suggestion.explanation,
            });
        }
        debug!(
            filename = %self.document.key.filename,
            suggestion = %suggestion.id,
            "suggestion proposed"
        );
        self.pending = Some(suggestion.clone());
        Ok(ProposeOutcome::Suggested(suggestion))
    }
}
