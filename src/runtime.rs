//! Runtime for conversations and approvals
//!
//! Glue between the pure state machine and the outside world: loads
//! inputs from the store, runs transitions, executes effects, and applies
//! approval callbacks.

mod approval;
mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use approval::{ApprovalError, ApprovalHandler, CallbackContext};
pub use executor::ConversationEngine;
pub use traits::*;

use crate::chat::Messenger;
use std::sync::Arc;

pub type SharedStore = Arc<dyn RecordStore>;
pub type SharedMessenger = Arc<dyn Messenger>;

/// Engine over type-erased collaborators, as served by the HTTP layer
pub type Engine = ConversationEngine<SharedStore, SharedMessenger>;
pub type Approvals = ApprovalHandler<SharedStore, SharedMessenger>;
