//! Approval callbacks
//!
//! Applies a state change requested from the approval buttons and
//! re-renders both places the expense is shown.

use super::traits::{RecordStore, StoreError};
use crate::chat::{Messenger, MessengerError, PostPatch};
use crate::config::{Config, ConfigHandle};
use crate::db::{Expense, ExpenseState};
use crate::format::{approval_actions, channel_message, format_expense};
use std::fmt;
use thiserror::Error;

/// Where the clicked button lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackContext {
    pub post_id: String,
    pub channel_id: String,
}

/// A re-render step that failed after the new state was stored
#[derive(Debug)]
pub struct StepFailure {
    pub step: &'static str,
    pub error: MessengerError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.error)
    }
}

fn describe(failures: &[StepFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("Expense {0} not found")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    /// State stored, but at least one message was not updated
    #[error("Expense {expense_id} set to {state} but {}", describe(.failures))]
    Partial {
        expense_id: String,
        state: ExpenseState,
        failures: Vec<StepFailure>,
    },
}

const STEP_STATUS: &str = "private status message";
const STEP_CHANNEL: &str = "channel announcement";

pub struct ApprovalHandler<S, M>
where
    S: RecordStore,
    M: Messenger,
{
    store: S,
    messenger: M,
    config: ConfigHandle,
}

impl<S, M> ApprovalHandler<S, M>
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

    /// Set `expense_id` to `state` and refresh its messages
    ///
    /// Any state may be set from any other, including the current one.
    /// Nothing is rolled back: if a message update fails after the store
    /// write, the new state stays and the failed steps are reported.
    pub async fn apply_state_change(
        &self,
        expense_id: &str,
        state: ExpenseState,
        callback: &CallbackContext,
    ) -> Result<Expense, ApprovalError> {
        let mut expense = self
            .store
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| ApprovalError::NotFound(expense_id.to_string()))?;

        let previous = expense.state;
        expense.state = state;
        self.store.save_expense(&expense).await?;
        tracing::info!(
            expense_id,
            from = %previous,
            to = %state,
            channel_id = %callback.channel_id,
            "Expense state changed"
        );

        let config = self.config.snapshot();
        let mut failures = Vec::new();

        match self.render(&config, &expense).await {
            Ok(table) => {
                if let Err(error) = self
                    .messenger
                    .patch_post(&expense.post_id, &PostPatch::message(table.clone()))
                    .await
                {
                    failures.push(StepFailure {
                        step: STEP_STATUS,
                        error,
                    });
                }
                if let Err(error) = self
                    .update_channel(&config, &expense, &table, callback)
                    .await
                {
                    failures.push(StepFailure {
                        step: STEP_CHANNEL,
                        error,
                    });
                }
            }
            // Without a table neither message can be refreshed
            Err(error) => failures.push(StepFailure {
                step: "attachment lookup",
                error,
            }),
        }

        if failures.is_empty() {
            return Ok(expense);
        }

        for failure in &failures {
            tracing::error!(
                expense_id,
                state = %state,
                step = failure.step,
                kind = ?failure.error.kind,
                error = %failure.error,
                "Expense state stored but message update failed"
            );
        }
        Err(ApprovalError::Partial {
            expense_id: expense.id,
            state,
            failures,
        })
    }

    async fn render(&self, config: &Config, expense: &Expense) -> Result<String, MessengerError> {
        let file_id = expense.file_id().unwrap_or_default();
        let file = self.messenger.file_info(file_id).await?;
        Ok(format_expense(expense, &file, &config.site_url))
    }

    async fn update_channel(
        &self,
        config: &Config,
        expense: &Expense,
        table: &str,
        callback: &CallbackContext,
    ) -> Result<(), MessengerError> {
        let submitter = self.messenger.user(&expense.user_id).await?;
        let patch = PostPatch::message(channel_message(&submitter, table))
            .with_actions(approval_actions(config, &expense.id));
        self.messenger.patch_post(&callback.post_id, &patch).await
    }
}
