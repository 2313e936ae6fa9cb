//! Shared test support: an in-memory document factory and a scripted
//! drafting provider that replays canned responses in order.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use redraft::{
    DocumentKey, DocumentRecord, DraftError, DraftProvider, DraftedEdit, DraftedPlan,
    SelectionRange,
};

/// Builds an in-memory document without touching storage.
pub fn memo_doc(filename: &str, content: &str) -> DocumentRecord {
    DocumentRecord {
        key: DocumentKey::new("test-instance", filename),
        current_content: content.to_owned(),
        queue_status: "pending".to_owned(),
        created_at: 0,
        updated_at: 0,
    }
}

/// A drafting provider that pops pre-loaded responses in FIFO order and
/// records what it was asked. Panics when the script runs dry, so a test
/// that makes an unexpected extra call fails loudly.
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Result<DraftedEdit, DraftError>>>,
    plan: Mutex<Option<DraftedPlan>>,
    pub seen_instructions: Mutex<Vec<String>>,
    pub seen_selections: Mutex<Vec<Option<SelectionRange>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            plan: Mutex::new(None),
            seen_instructions: Mutex::new(Vec::new()),
            seen_selections: Mutex::new(Vec::new()),
        }
    }

    pub fn push_edit(&self, content: &str, explanation: &str) {
        self.queue.lock().unwrap().push_back(Ok(DraftedEdit {
            updated_content: content.to_owned(),
            explanation: explanation.to_owned(),
            diff_hints: Vec::new(),
        }));
    }

    pub fn push_failure(&self, reason: &str) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Err(DraftError::new(reason)));
    }

    pub fn push_empty(&self) {
        self.push_edit("", "nothing came back");
    }

    pub fn set_plan(&self, plan: DraftedPlan) {
        *self.plan.lock().unwrap() = Some(plan);
    }

    pub fn calls(&self) -> usize {
        self.seen_instructions.lock().unwrap().len()
    }
}

impl DraftProvider for ScriptedProvider {
    async fn generate_edit(
        &self,
        _current: &str,
        instruction: &str,
        selection: Option<SelectionRange>,
    ) -> Result<DraftedEdit, DraftError> {
        self.seen_instructions
            .lock()
            .unwrap()
            .push(instruction.to_owned());
        self.seen_selections.lock().unwrap().push(selection);
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted provider ran out of responses")
    }

    async fn generate_plan(&self, _transcript: &str) -> Result<DraftedPlan, DraftError> {
        self.plan
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DraftError::new("no plan scripted"))
    }
}
