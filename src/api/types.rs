//! API request types

use serde::Deserialize;

/// Body the chat server posts when an interactive button is clicked
#[derive(Debug, Deserialize)]
pub struct ActionCallbackRequest {
    /// Clicking user, also carried in the auth header
    #[serde(default)]
    pub user_id: String,
    /// Post holding the clicked button
    pub post_id: String,
    pub channel_id: String,
}
