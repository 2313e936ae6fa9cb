//! Multi-document batch editing with independent per-document outcomes.

use futures::future::join_all;
use redraft_core::types::{Author, DocumentKey, DocumentRecord};
use redraft_diff::{is_unchanged, DiffLine};
use tracing::{debug, warn};

use crate::draft::DraftProvider;
use crate::history::VersionStore;
use crate::suggest::Suggestion;

/// Outcome of a batch edit for one targeted document.
///
/// Results are order-aligned with the input document set and fully
/// independent: a failed document carries `error` and nothing else, and its
/// failure says nothing about any other result.
#[derive(Debug, Clone)]
pub struct BatchEditResult {
    pub key: DocumentKey,
    pub success: bool,
    /// The computed diff, on success with changes.
    pub diff: Option<Vec<DiffLine>>,
    pub explanation: Option<String>,
    /// Why generation or the auto-save failed, on failure.
    pub error: Option<String>,
    /// The committed version id, when `auto_save` was set and changes landed.
    pub new_version_id: Option<String>,
    /// Set when the draft was identical to the current content. Still a
    /// success — just a no-op, and no version is written for it.
    pub no_changes: bool,
    /// In review mode (`auto_save` unset), the suggestion left for
    /// individual adoption via `EditSession::adopt_suggestion`.
    pub suggestion: Option<Suggestion>,
}

impl BatchEditResult {
    fn failed(key: DocumentKey, error: String) -> Self {
        Self {
            key,
            success: false,
            diff: None,
            explanation: None,
            error: Some(error),
            new_version_id: None,
            no_changes: false,
            suggestion: None,
        }
    }
}

/// Applies one instruction across `docs`, one independent outcome each.
///
/// Generation is fanned out concurrently over all documents (`join_all`
/// preserves input order); outcomes are then applied sequentially per
/// document. A failed document is recorded and the batch continues — one
/// document's failure or latency never blocks or corrupts another's outcome,
/// and the result vector is returned only after every document has reached a
/// terminal state.
///
/// With `auto_save` set, each successful draft is committed immediately as an
/// assistant-authored version whose message is the instruction, and the
/// document value is updated in place. With `auto_save` unset, documents are
/// left untouched and each successful result carries a pending-ready
/// [`Suggestion`] plus its diff and explanation for review.
pub async fn apply_batch<P: DraftProvider>(
    provider: &P,
    store: &VersionStore,
    docs: &mut [DocumentRecord],
    instruction: &str,
    auto_save: bool,
) -> Vec<BatchEditResult> {
    // Phase 1: concurrent generation. Read-only over the documents, so the
    // slowest call bounds the phase but cannot interleave with any mutation.
    let drafts = join_all(
        docs.iter()
            .map(|doc| provider.generate_edit(&doc.current_content, instruction, None)),
    )
    .await;

    // Phase 2: sequential application, one terminal result per document.
    let mut results = Vec::with_capacity(docs.len());
    for (doc, draft) in docs.iter_mut().zip(drafts) {
        let edit = match draft {
            Ok(edit) if edit.updated_content.is_empty() => {
                warn!(filename = %doc.key.filename, "batch draft returned empty content");
                results.push(BatchEditResult::failed(
                    doc.key.clone(),
                    "drafting capability returned empty content".to_owned(),
                ));
                continue;
            }
            Ok(edit) => edit,
            Err(e) => {
                warn!(filename = %doc.key.filename, reason = %e.reason, "batch draft failed");
                results.push(BatchEditResult::failed(doc.key.clone(), e.reason));
                continue;
            }
        };

        let suggestion = Suggestion::from_draft(
            instruction,
            doc.current_content.clone(),
            edit,
            redraft_diff::DEFAULT_MAX_CELLS,
        );

        if is_unchanged(&suggestion.diff) {
            results.push(BatchEditResult {
                key: doc.key.clone(),
                success: true,
                diff: None,
                explanation: Some(suggestion.explanation),
                error: None,
                new_version_id: None,
                no_changes: true,
                suggestion: None,
            });
            continue;
        }

        if auto_save {
            doc.current_content = suggestion.suggested_content.clone();
            match store.save(doc, instruction, Author::Assistant).await {
                Ok(version) => {
                    debug!(
                        filename = %doc.key.filename,
                        version = %version.id,
                        "batch edit auto-saved"
                    );
                    results.push(BatchEditResult {
                        key: doc.key.clone(),
                        success: true,
                        diff: Some(suggestion.diff),
                        explanation: Some(suggestion.explanation),
                        error: None,
                        new_version_id: Some(version.id),
                        no_changes: false,
                        suggestion: None,
                    });
                }
                Err(e) => {
                    // The save transaction rolled back; put the in-memory
                    // value back in step with the stored row.
                    doc.current_content = suggestion.original_content.clone();
                    results.push(BatchEditResult::failed(doc.key.clone(), e.to_string()));
                }
            }
        } else {
            results.push(BatchEditResult {
                key: doc.key.clone(),
                success: true,
                diff: Some(suggestion.diff.clone()),
                explanation: Some(suggestion.explanation.clone()),
                error: None,
                new_version_id: None,
                no_changes: false,
                suggestion: Some(suggestion),
            });
        }
    }

    results
}
