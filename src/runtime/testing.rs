//! Mock implementations for testing
//!
//! These mocks enable engine and handler tests without real I/O.

use super::traits::{RecordStore, StoreError};
use crate::chat::{FileInfo, Messenger, MessengerError, NewPost, PostPatch, UserProfile};
use crate::config::{Config, DEFAULT_PLUGIN_ID};
use crate::db::{Draft, Expense, UserDefaults};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

/// Config pointing at `server_url`, bot `bot`, approval channel `finance`
pub fn test_config(server_url: &str) -> Config {
    Config {
        server_url: server_url.to_string(),
        site_url: server_url.to_string(),
        token: "test-token".to_string(),
        bot_user_id: "bot".to_string(),
        channel_id: "finance".to_string(),
        plugin_id: DEFAULT_PLUGIN_ID.to_string(),
        webhook_token: Some("hook-token".to_string()),
        db_path: PathBuf::from(":memory:"),
        port: 0,
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetUserDefaults,
    SaveUserDefaults,
    GetDraft,
    SaveDraft,
    DeleteDraft,
    GetExpense,
    SaveExpense,
}

/// In-memory store with per-operation failure injection
#[derive(Default)]
pub struct MemoryStore {
    defaults: Mutex<HashMap<String, UserDefaults>>,
    drafts: Mutex<HashMap<String, Draft>>,
    expenses: Mutex<HashMap<String, Expense>>,
    failing: Mutex<HashSet<StoreOp>>,
    writes: Mutex<usize>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `op` fail
    pub fn fail(&self, op: StoreOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn insert_defaults(&self, defaults: UserDefaults) {
        self.defaults
            .lock()
            .unwrap()
            .insert(defaults.user_id.clone(), defaults);
    }

    pub fn insert_draft(&self, draft: Draft) {
        self.drafts
            .lock()
            .unwrap()
            .insert(draft.user_id.clone(), draft);
    }

    pub fn insert_expense(&self, expense: Expense) {
        self.expenses
            .lock()
            .unwrap()
            .insert(expense.id.clone(), expense);
    }

    pub fn defaults(&self, user_id: &str) -> Option<UserDefaults> {
        self.defaults.lock().unwrap().get(user_id).cloned()
    }

    pub fn draft(&self, user_id: &str) -> Option<Draft> {
        self.drafts.lock().unwrap().get(user_id).cloned()
    }

    pub fn expense(&self, expense_id: &str) -> Option<Expense> {
        self.expenses.lock().unwrap().get(expense_id).cloned()
    }

    pub fn expenses(&self) -> Vec<Expense> {
        self.expenses.lock().unwrap().values().cloned().collect()
    }

    /// Number of successful writes and deletes so far
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn check(&self, op: StoreOp) -> Result<(), StoreError> {
        if self.failing.lock().unwrap().contains(&op) {
            let busy = rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY);
            let err = rusqlite::Error::SqliteFailure(busy, Some(format!("injected {op:?} failure")));
            return Err(StoreError::Db(err.into()));
        }
        Ok(())
    }

    fn record_write(&self) {
        *self.writes.lock().unwrap() += 1;
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_user_defaults(&self, user_id: &str) -> Result<Option<UserDefaults>, StoreError> {
        self.check(StoreOp::GetUserDefaults)?;
        Ok(self.defaults(user_id))
    }

    async fn save_user_defaults(&self, defaults: &UserDefaults) -> Result<(), StoreError> {
        self.check(StoreOp::SaveUserDefaults)?;
        self.insert_defaults(defaults.clone());
        self.record_write();
        Ok(())
    }

    async fn get_draft(&self, user_id: &str) -> Result<Option<Draft>, StoreError> {
        self.check(StoreOp::GetDraft)?;
        Ok(self.draft(user_id))
    }

    async fn save_draft(&self, user_id: &str, draft: &Draft) -> Result<(), StoreError> {
        self.check(StoreOp::SaveDraft)?;
        self.drafts
            .lock()
            .unwrap()
            .insert(user_id.to_string(), draft.clone());
        self.record_write();
        Ok(())
    }

    async fn delete_draft(&self, user_id: &str) -> Result<(), StoreError> {
        self.check(StoreOp::DeleteDraft)?;
        self.drafts.lock().unwrap().remove(user_id);
        self.record_write();
        Ok(())
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, StoreError> {
        self.check(StoreOp::GetExpense)?;
        Ok(self.expense(expense_id))
    }

    async fn save_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        self.check(StoreOp::SaveExpense)?;
        self.insert_expense(expense.clone());
        self.record_write();
        Ok(())
    }
}

// ============================================================================
// Mock Messenger
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessengerOp {
    DirectChannel,
    /// Plain replies only
    SendDirect,
    /// Pinned status messages only
    SendPinned,
    CreatePost,
    PatchPost,
    FileInfo,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessage {
    pub user_id: String,
    pub text: String,
    pub pinned: bool,
    pub post_id: String,
}

/// Channel id the mock reports for every bot-user direct conversation
pub const BOT_DIRECT_CHANNEL: &str = "dm";

/// Messenger that records every call and hands out sequential post ids
#[derive(Default)]
pub struct MockMessenger {
    files: Mutex<HashMap<String, FileInfo>>,
    users: Mutex<HashMap<String, UserProfile>>,
    failing: Mutex<HashSet<MessengerOp>>,
    next_post: Mutex<usize>,
    pub direct: Mutex<Vec<DirectMessage>>,
    pub posts: Mutex<Vec<(String, NewPost)>>,
    pub patches: Mutex<Vec<(String, PostPatch)>>,
}

#[allow(dead_code)]
impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, id: &str, name: &str) -> Self {
        self.files.lock().unwrap().insert(
            id.to_string(),
            FileInfo {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        self
    }

    pub fn with_user(self, id: &str, first_name: &str, last_name: &str) -> Self {
        self.users.lock().unwrap().insert(
            id.to_string(),
            UserProfile {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            },
        );
        self
    }

    pub fn fail(&self, op: MessengerOp) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Texts sent to `user_id`, in order, excluding pinned status messages
    pub fn replies_to(&self, user_id: &str) -> Vec<String> {
        self.direct
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id && !m.pinned)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn pinned(&self) -> Vec<DirectMessage> {
        self.direct
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.pinned)
            .cloned()
            .collect()
    }

    pub fn channel_posts(&self) -> Vec<(String, NewPost)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn recorded_patches(&self) -> Vec<(String, PostPatch)> {
        self.patches.lock().unwrap().clone()
    }

    fn check(&self, op: MessengerOp) -> Result<(), MessengerError> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(MessengerError::server_error(format!(
                "injected {op:?} failure"
            )));
        }
        Ok(())
    }

    fn next_post_id(&self) -> String {
        let mut next = self.next_post.lock().unwrap();
        *next += 1;
        format!("post-{next}")
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn direct_channel(&self, _user_id: &str) -> Result<String, MessengerError> {
        self.check(MessengerOp::DirectChannel)?;
        Ok(BOT_DIRECT_CHANNEL.to_string())
    }

    async fn send_direct(
        &self,
        user_id: &str,
        text: &str,
        pinned: bool,
    ) -> Result<String, MessengerError> {
        self.check(if pinned {
            MessengerOp::SendPinned
        } else {
            MessengerOp::SendDirect
        })?;
        let post_id = self.next_post_id();
        self.direct.lock().unwrap().push(DirectMessage {
            user_id: user_id.to_string(),
            text: text.to_string(),
            pinned,
            post_id: post_id.clone(),
        });
        Ok(post_id)
    }

    async fn create_post(&self, post: &NewPost) -> Result<String, MessengerError> {
        self.check(MessengerOp::CreatePost)?;
        let post_id = self.next_post_id();
        self.posts
            .lock()
            .unwrap()
            .push((post_id.clone(), post.clone()));
        Ok(post_id)
    }

    async fn patch_post(&self, post_id: &str, patch: &PostPatch) -> Result<(), MessengerError> {
        self.check(MessengerOp::PatchPost)?;
        self.patches
            .lock()
            .unwrap()
            .push((post_id.to_string(), patch.clone()));
        Ok(())
    }

    async fn file_info(&self, file_id: &str) -> Result<FileInfo, MessengerError> {
        self.check(MessengerOp::FileInfo)?;
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| MessengerError::not_found(format!("file {file_id}")))
    }

    async fn user(&self, user_id: &str) -> Result<UserProfile, MessengerError> {
        self.check(MessengerOp::User)?;
        self.users
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| MessengerError::not_found(format!("user {user_id}")))
    }
}
