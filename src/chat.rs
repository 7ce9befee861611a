//! Chat server abstraction
//!
//! The conversation engine and approval handler only decide what to say;
//! delivery goes through [`Messenger`].

mod error;
mod mattermost;
mod types;

pub use error::{MessengerError, MessengerErrorKind};
pub use mattermost::MattermostClient;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Outbound operations against the chat server
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Id of the one-to-one channel between the bot and `user_id`
    async fn direct_channel(&self, user_id: &str) -> Result<String, MessengerError>;

    /// Post `text` in the bot's direct channel with `user_id`, returning the post id
    async fn send_direct(
        &self,
        user_id: &str,
        text: &str,
        pinned: bool,
    ) -> Result<String, MessengerError>;

    /// Create a post as the bot, returning its id
    async fn create_post(&self, post: &NewPost) -> Result<String, MessengerError>;

    /// Update an existing post in place
    async fn patch_post(&self, post_id: &str, patch: &PostPatch) -> Result<(), MessengerError>;

    async fn file_info(&self, file_id: &str) -> Result<FileInfo, MessengerError>;

    async fn user(&self, user_id: &str) -> Result<UserProfile, MessengerError>;
}

#[async_trait]
impl<T: Messenger + ?Sized> Messenger for Arc<T> {
    async fn direct_channel(&self, user_id: &str) -> Result<String, MessengerError> {
        (**self).direct_channel(user_id).await
    }

    async fn send_direct(
        &self,
        user_id: &str,
        text: &str,
        pinned: bool,
    ) -> Result<String, MessengerError> {
        (**self).send_direct(user_id, text, pinned).await
    }

    async fn create_post(&self, post: &NewPost) -> Result<String, MessengerError> {
        (**self).create_post(post).await
    }

    async fn patch_post(&self, post_id: &str, patch: &PostPatch) -> Result<(), MessengerError> {
        (**self).patch_post(post_id, patch).await
    }

    async fn file_info(&self, file_id: &str) -> Result<FileInfo, MessengerError> {
        (**self).file_info(file_id).await
    }

    async fn user(&self, user_id: &str) -> Result<UserProfile, MessengerError> {
        (**self).user(user_id).await
    }
}
