//! Materializing a generated plan into queued documents.

use redraft_core::types::{DocumentKey, DocumentRecord};
use tracing::info;

use crate::draft::DraftedPlan;
use crate::error::EngineError;
use crate::history::VersionStore;

/// Creates one document per planned filename under `instance_id`, in the
/// provider's suggested order, and returns the records.
///
/// Filenames in `suggested_order` come first; any planned document the
/// provider left out of the ordering is appended afterwards in plan order.
/// Already existing documents are returned as-is (creation is first-open
/// semantics), so re-registering a plan is harmless. New documents start
/// empty with `pending` queue status for the external scheduler to pick up.
///
/// # Errors
///
/// Returns `EngineError::Storage` if a document lookup or creation fails;
/// documents created before the failure remain created.
pub async fn register_plan(
    store: &VersionStore,
    instance_id: &str,
    plan: &DraftedPlan,
) -> Result<Vec<DocumentRecord>, EngineError> {
    let mut ordered: Vec<&str> = plan.suggested_order.iter().map(String::as_str).collect();
    for doc in &plan.documents {
        if !ordered.contains(&doc.filename.as_str()) {
            ordered.push(&doc.filename);
        }
    }

    let mut records = Vec::with_capacity(ordered.len());
    for filename in ordered {
        let key = DocumentKey::new(instance_id, filename);
        records.push(store.open_document(&key).await?);
    }
    info!(
        instance = instance_id,
        title = %plan.title,
        documents = records.len(),
        "plan registered"
    );
    Ok(records)
}
