//! Conversation engine
//!
//! Loads the user's draft and defaults, runs the pure transition and
//! executes the resulting effects against the store and the chat server.

use super::traits::{RecordStore, StoreError};
use crate::chat::{ChannelType, InboundPost, Messenger, MessengerError, NewPost};
use crate::config::{Config, ConfigHandle};
use crate::db::{Expense, UserDefaults};
use crate::format::{approval_actions, channel_message, format_expense};
use crate::messages;
use crate::state_machine::{
    is_reset_command, transition, ConvContext, DraftStage, Effect, Event, Submission,
    TransitionError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Chat server error: {0}")]
    Messenger(#[from] MessengerError),
}

/// Per-user dialog driver
///
/// Stateless between calls: everything it needs is reloaded from the store
/// for each message.
pub struct ConversationEngine<S, M>
where
    S: RecordStore,
    M: Messenger,
{
    store: S,
    messenger: M,
    config: ConfigHandle,
}

impl<S, M> ConversationEngine<S, M>
where
    S: RecordStore,
    M: Messenger,
{
    pub fn new(store: S, messenger: M, config: ConfigHandle) -> Self {
        Self {
            store,
            messenger,
            config,
        }
    }

    /// Entry point for new-message events
    ///
    /// Only direct conversations between the sender and the bot are
    /// handled; the bot's own posts and every other channel are ignored.
    pub async fn handle_post(&self, post: &InboundPost) -> Result<(), EngineError> {
        if post.user_id == self.config.snapshot().bot_user_id {
            tracing::debug!(channel_id = %post.channel_id, "Ignoring own post");
            return Ok(());
        }
        if post.channel_type != ChannelType::Direct {
            tracing::debug!(
                channel_id = %post.channel_id,
                channel_type = ?post.channel_type,
                "Ignoring post outside direct conversation"
            );
            return Ok(());
        }
        let bot_channel = self
            .messenger
            .direct_channel(&post.user_id)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    user_id = %post.user_id,
                    kind = ?e.kind,
                    error = %e,
                    "Failed to resolve direct channel with bot"
                );
            })?;
        if post.channel_id != bot_channel {
            tracing::debug!(
                channel_id = %post.channel_id,
                user_id = %post.user_id,
                "Ignoring direct message not addressed to the bot"
            );
            return Ok(());
        }

        self.handle_message(&post.user_id, &post.message, post.file_ids.clone())
            .await
    }

    /// Advance `user_id`'s conversation by one message
    ///
    /// Failures are logged and answered with the generic system error
    /// message before being returned.
    pub async fn handle_message(
        &self,
        user_id: &str,
        text: &str,
        file_ids: Vec<String>,
    ) -> Result<(), EngineError> {
        let result = self.process(user_id, text, file_ids).await;
        if let Err(e) = &result {
            tracing::error!(user_id, error = %e, "Failed to handle message");
            self.reply(user_id, messages::SYSTEM_ERROR).await;
        }
        result
    }

    async fn process(
        &self,
        user_id: &str,
        text: &str,
        file_ids: Vec<String>,
    ) -> Result<(), EngineError> {
        let draft = match self.store.get_draft(user_id).await {
            Ok(draft) => draft,
            // An unreadable draft must not trap the user
            Err(e) if is_reset_command(text) => {
                tracing::warn!(user_id, error = %e, "Discarding unreadable draft");
                self.store.delete_draft(user_id).await?;
                self.reply(user_id, messages::RESTART_HINT).await;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        // Defaults only matter when a conversation starts or offers them
        let needs_defaults = !is_reset_command(text)
            && draft
                .as_ref()
                .map_or(true, |d| matches!(d.stage, DraftStage::AskDefaults));
        let defaults = if needs_defaults {
            self.store.get_user_defaults(user_id).await?
        } else {
            None
        };
        let context = ConvContext::new(user_id, defaults);

        let result = transition(draft.as_ref(), &context, Event::with_files(text, file_ids))?;

        tracing::debug!(
            user_id,
            from = draft.as_ref().map_or("none", |d| d.stage.as_str()),
            to = result.next.as_ref().map_or("none", |d| d.stage.as_str()),
            "Draft transition"
        );

        for effect in result.effects {
            self.execute_effect(user_id, effect).await?;
        }
        Ok(())
    }

    async fn execute_effect(&self, user_id: &str, effect: Effect) -> Result<(), EngineError> {
        match effect {
            Effect::Reply { text } => self.reply(user_id, &text).await,
            Effect::SaveDraft { draft } => self.store.save_draft(user_id, &draft).await?,
            Effect::DeleteDraft => self.store.delete_draft(user_id).await?,
            Effect::Finalize { submission } => self.finalize(submission).await?,
        }
        Ok(())
    }

    /// Best-effort direct message
    async fn reply(&self, user_id: &str, text: &str) {
        if let Err(e) = self.messenger.send_direct(user_id, text, false).await {
            tracing::error!(user_id, kind = ?e.kind, error = %e, "Failed to send reply");
        }
    }

    /// Turn a completed draft into an expense
    ///
    /// The pinned status message must exist before the expense is stored, so
    /// a delivery failure leaves no record behind. Once the expense is stored
    /// the remaining steps are logged on failure but do not undo it.
    async fn finalize(&self, submission: Submission) -> Result<(), EngineError> {
        let config = self.config.snapshot();
        let user_id = submission.user_id.clone();
        let file_id = submission.file_id.clone();
        let defaults = UserDefaults {
            user_id: user_id.clone(),
            account: submission.account.clone(),
            name: submission.name.clone(),
        };

        let mut expense = Expense::submitted(uuid::Uuid::new_v4().simple().to_string(), submission);
        let file = self.messenger.file_info(&file_id).await?;
        let table = format_expense(&expense, &file, &config.site_url);

        expense.post_id = self.messenger.send_direct(&user_id, &table, true).await?;
        self.store.save_expense(&expense).await?;
        tracing::info!(expense_id = %expense.id, user_id = %user_id, "Expense submitted");

        if let Err(e) = self.store.save_user_defaults(&defaults).await {
            tracing::error!(user_id = %user_id, error = %e, "Failed to save user defaults");
        }
        if let Err(e) = self.store.delete_draft(&user_id).await {
            tracing::error!(user_id = %user_id, error = %e, "Failed to delete completed draft");
        }
        if let Err(e) = self.announce(&config, &expense, &table).await {
            tracing::error!(
                expense_id = %expense.id,
                error = %e,
                "Failed to announce expense in approval channel"
            );
        }
        Ok(())
    }

    async fn announce(
        &self,
        config: &Config,
        expense: &Expense,
        table: &str,
    ) -> Result<String, MessengerError> {
        let submitter = self.messenger.user(&expense.user_id).await?;
        self.messenger
            .create_post(&NewPost {
                channel_id: config.channel_id.clone(),
                message: channel_message(&submitter, table),
                actions: approval_actions(config, &expense.id),
            })
            .await
    }
}
