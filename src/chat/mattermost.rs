//! Mattermost REST API v4 client

use super::{FileInfo, Messenger, MessengerError, NewPost, PostAction, PostPatch, UserProfile};
use crate::config::ConfigHandle;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Messenger backed by a Mattermost server, posting as the bot account
///
/// Server URL and token are read from the current config snapshot on every
/// call, so a reload takes effect without rebuilding the client.
#[derive(Clone)]
pub struct MattermostClient {
    client: Client,
    config: ConfigHandle,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

impl MattermostClient {
    pub fn new(config: ConfigHandle) -> Result<Self, MessengerError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MessengerError::network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String, MessengerError> {
        let config = self.config.snapshot();
        let url = format!("{}/api/v4{path}", config.server_url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&config.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MessengerError::network(format!("Request timeout: {e}"))
            } else {
                MessengerError::network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MessengerError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            tracing::warn!(%method, path, %status, "Chat server call failed");
            return Err(MessengerError::from_status(status, &text));
        }

        Ok(text)
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, MessengerError> {
        let text = self.call(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            MessengerError::invalid_response(format!("Failed to parse response from {path}: {e}"))
        })
    }
}

/// Message attachment carrying interactive buttons
fn attachment_props(actions: &[PostAction]) -> Value {
    let actions: Vec<Value> = actions
        .iter()
        .map(|action| {
            json!({
                "id": action.id,
                "name": action.name,
                "type": "button",
                "style": action.style,
                "integration": { "url": action.url },
            })
        })
        .collect();
    json!({ "attachments": [{ "actions": actions }] })
}

#[async_trait]
impl Messenger for MattermostClient {
    // Creating a direct channel that already exists returns the existing one
    async fn direct_channel(&self, user_id: &str) -> Result<String, MessengerError> {
        let bot_user_id = self.config.snapshot().bot_user_id.clone();
        let channel: Created = self
            .call_json(
                Method::POST,
                "/channels/direct",
                Some(&json!([bot_user_id, user_id])),
            )
            .await?;
        Ok(channel.id)
    }

    async fn send_direct(
        &self,
        user_id: &str,
        text: &str,
        pinned: bool,
    ) -> Result<String, MessengerError> {
        let channel_id = self.direct_channel(user_id).await?;

        let post: Created = self
            .call_json(
                Method::POST,
                "/posts",
                Some(&json!({ "channel_id": channel_id, "message": text })),
            )
            .await?;

        // The post is already visible; a failed pin does not undo it
        if pinned {
            if let Err(e) = self
                .call(Method::POST, &format!("/posts/{}/pin", post.id), None)
                .await
            {
                tracing::warn!(post_id = %post.id, error = %e, "Failed to pin post");
            }
        }

        Ok(post.id)
    }

    async fn create_post(&self, post: &NewPost) -> Result<String, MessengerError> {
        let mut body = json!({ "channel_id": post.channel_id, "message": post.message });
        if !post.actions.is_empty() {
            body["props"] = attachment_props(&post.actions);
        }
        let created: Created = self.call_json(Method::POST, "/posts", Some(&body)).await?;
        Ok(created.id)
    }

    async fn patch_post(&self, post_id: &str, patch: &PostPatch) -> Result<(), MessengerError> {
        let mut body = json!({ "message": patch.message });
        if let Some(actions) = &patch.actions {
            body["props"] = attachment_props(actions);
        }
        self.call(Method::PUT, &format!("/posts/{post_id}/patch"), Some(&body))
            .await?;
        Ok(())
    }

    async fn file_info(&self, file_id: &str) -> Result<FileInfo, MessengerError> {
        self.call_json(Method::GET, &format!("/files/{file_id}/info"), None)
            .await
    }

    async fn user(&self, user_id: &str) -> Result<UserProfile, MessengerError> {
        self.call_json(Method::GET, &format!("/users/{user_id}"), None)
            .await
    }
}
