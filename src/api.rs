//! HTTP API for the expense bot
//!
//! Approval callbacks from the chat server's interactive buttons, and the
//! new-message event webhook that drives conversations.

mod auth;
mod handlers;
mod types;

pub use handlers::create_router;

use crate::config::ConfigHandle;
use crate::runtime::{
    ApprovalHandler, Approvals, ConversationEngine, Engine, SharedMessenger, SharedStore,
};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub approvals: Arc<Approvals>,
    pub config: ConfigHandle,
}

impl AppState {
    pub fn new(store: SharedStore, messenger: SharedMessenger, config: ConfigHandle) -> Self {
        Self {
            engine: Arc::new(ConversationEngine::new(
                store.clone(),
                messenger.clone(),
                config.clone(),
            )),
            approvals: Arc::new(ApprovalHandler::new(store, messenger, config.clone())),
            config,
        }
    }
}
