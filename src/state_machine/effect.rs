//! Effects produced by state transitions

use crate::db::Submission;
use crate::state_machine::state::Draft;

/// Effects to be executed, in order, after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Direct message to the user
    Reply { text: String },

    /// Persist the draft
    SaveDraft { draft: Draft },

    /// Remove the user's draft
    DeleteDraft,

    /// Create the expense, post its status, remember defaults, clear the draft
    Finalize { submission: Submission },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply { text: text.into() }
    }

    pub fn save_draft(draft: Draft) -> Self {
        Effect::SaveDraft { draft }
    }
}
