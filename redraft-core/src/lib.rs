//! Durable document and version storage for the revision engine.
//!
//! A single WAL-mode SQLite database holds every document's current content
//! plus its append-only version history. All access goes through
//! [`db::open_db`] and the async functions in [`db`]; writes run inside
//! `BEGIN IMMEDIATE` transactions so a save is atomic per document.

pub mod db;
pub mod schema;
pub mod types;
