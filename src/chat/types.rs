//! Chat server data types

use serde::{Deserialize, Serialize};

/// Kind of channel a post was made in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelType {
    #[serde(rename = "O")]
    Open,
    #[serde(rename = "P")]
    Private,
    /// One-to-one conversation
    #[serde(rename = "D")]
    Direct,
    #[serde(rename = "G")]
    Group,
}

/// New-message event delivered by the chat server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundPost {
    pub user_id: String,
    pub channel_id: String,
    pub channel_type: ChannelType,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub file_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    Success,
    Danger,
}

/// Interactive button posting back to `url` when clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAction {
    pub id: String,
    pub name: String,
    pub style: ActionStyle,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub channel_id: String,
    pub message: String,
    pub actions: Vec<PostAction>,
}

/// Partial update of an existing post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPatch {
    pub message: String,
    /// `None` leaves the post's buttons untouched
    pub actions: Option<Vec<PostAction>>,
}

impl PostPatch {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            actions: None,
        }
    }

    pub fn with_actions(mut self, actions: Vec<PostAction>) -> Self {
        self.actions = Some(actions);
        self
    }
}

/// Attachment metadata
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}
