//! redraft — document revision engine.
//!
//! Lets a caller iteratively revise text documents with an automated drafting
//! assistant while keeping a safe, inspectable trail of every change:
//!
//! - [`session::EditSession`] — the propose / accept / reject / refine
//!   workflow with a session-local undo stack.
//! - [`history::VersionStore`] — append-only per-document version history
//!   with revert-as-new-version.
//! - [`batch::apply_batch`] — one instruction across many documents, with
//!   independent per-document outcomes.
//! - [`draft::DraftProvider`] — the boundary to the external text-generation
//!   capability.
//!
//! Line diffing lives in the `redraft-diff` crate (re-exported here as
//! [`diff`] and friends); durable storage lives in `redraft-core`.
//!
//! The library emits `tracing` events at operation boundaries and installs
//! no subscriber — that is the embedding application's call.

pub mod batch;
pub mod config;
pub mod draft;
pub mod error;
pub mod history;
pub mod plan;
pub mod session;
pub mod suggest;

pub use batch::{apply_batch, BatchEditResult};
pub use config::EngineConfig;
pub use draft::{DraftError, DraftProvider, DraftedEdit, DraftedPlan, PlannedDocument, SelectionRange};
pub use error::EngineError;
pub use history::VersionStore;
pub use plan::register_plan;
pub use session::{CommandOutcome, EditSession};
pub use suggest::{ProposeOutcome, Suggestion};

pub use redraft_core::types::{Author, DocumentKey, DocumentRecord, Version};
// Stand-alone diff between two arbitrary text blobs, exposed for display use.
pub use redraft_diff::{compact_modifies, diff, diff_with_limit, stats, DiffKind, DiffLine, DiffStats};
