//! Pure state transition function
//!
//! Given the user's current draft (if any), the stored defaults and the
//! incoming message, decide the next draft and the effects to run. No I/O
//! happens here; the engine loads inputs beforehand and executes the
//! effects afterwards.

use super::validation::{normalize_command, parse_iban, parse_yes_no};
use super::{ConvContext, Draft, DraftStage, Effect, Event, Submission};
use crate::messages;
use thiserror::Error;

const CMD_EXPENSE: &str = "expense";
const CMD_RESET: &str = "reset";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    /// Draft after the transition; `None` means no conversation in progress
    pub next: Option<Draft>,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(next: Option<Draft>) -> Self {
        Self {
            next,
            effects: vec![],
        }
    }

    /// Move to `draft` and persist it before anything else runs
    fn advance(draft: Draft) -> Self {
        Self::new(Some(draft.clone())).with_effect(Effect::save_draft(draft))
    }

    /// Keep the current draft as-is
    fn stay(draft: &Draft) -> Self {
        Self::new(Some(draft.clone()))
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_effect(Effect::reply(text))
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Defaults accepted but none are stored for user {0}")]
    MissingDefaults(String),
}

/// Pure transition function
pub fn transition(
    draft: Option<&Draft>,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let Event::UserMessage { text, file_ids } = event;
    let command = normalize_command(&text);

    let Some(draft) = draft else {
        return Ok(start(context, &command));
    };

    if is_reset_command(&text) {
        return Ok(TransitionResult::new(None)
            .with_effect(Effect::DeleteDraft)
            .with_reply(messages::RESTART_HINT));
    }

    let result = match &draft.stage {
        DraftStage::AskDefaults => match parse_yes_no(&text) {
            Some(true) => {
                let defaults = context
                    .defaults
                    .as_ref()
                    .ok_or_else(|| TransitionError::MissingDefaults(context.user_id.clone()))?;
                TransitionResult::advance(draft.advance(DraftStage::AskAmount {
                    account: defaults.account.clone(),
                    name: defaults.name.clone(),
                }))
                .with_reply(messages::DEFAULTS_ACCEPTED)
                .with_reply(messages::ASK_AMOUNT)
            }
            Some(false) => TransitionResult::advance(draft.advance(DraftStage::AskAccount))
                .with_reply(messages::DEFAULTS_DECLINED)
                .with_reply(messages::ASK_IBAN),
            None => TransitionResult::stay(draft).with_reply(messages::YES_OR_NO),
        },

        DraftStage::AskAccount => match parse_iban(&text) {
            Some(account) => {
                TransitionResult::advance(draft.advance(DraftStage::AskName { account }))
                    .with_reply(messages::ASK_NAME)
            }
            None => TransitionResult::stay(draft).with_reply(messages::INVALID_IBAN),
        },

        DraftStage::AskName { account } => {
            let name = text.trim();
            if name.is_empty() {
                TransitionResult::stay(draft).with_reply(messages::ASK_NAME)
            } else {
                TransitionResult::advance(draft.advance(DraftStage::AskAmount {
                    account: account.clone(),
                    name: name.to_string(),
                }))
                .with_reply(messages::ASK_AMOUNT)
            }
        }

        // Amount is free text; no numeric validation
        DraftStage::AskAmount { account, name } => {
            TransitionResult::advance(draft.advance(DraftStage::AskDescription {
                account: account.clone(),
                name: name.clone(),
                amount: text.trim().to_string(),
            }))
            .with_reply(messages::ASK_DESCRIPTION)
        }

        DraftStage::AskDescription {
            account,
            name,
            amount,
        } => TransitionResult::advance(draft.advance(DraftStage::AskFile {
            account: account.clone(),
            name: name.clone(),
            amount: amount.clone(),
            description: text.trim().to_string(),
        }))
        .with_reply(messages::ASK_FILE),

        DraftStage::AskFile {
            account,
            name,
            amount,
            description,
        } => match file_ids.as_slice() {
            [file_id] => TransitionResult::new(None)
                .with_effect(Effect::Finalize {
                    submission: Submission {
                        user_id: draft.user_id.clone(),
                        account: account.clone(),
                        name: name.clone(),
                        amount: amount.clone(),
                        description: description.clone(),
                        file_id: file_id.clone(),
                    },
                })
                .with_reply(messages::SAVED)
                .with_reply(messages::RESTART_HINT),
            _ => TransitionResult::stay(draft).with_reply(messages::SINGLE_FILE),
        },
    };

    Ok(result)
}

/// Whether `text` asks to abandon the current draft
pub fn is_reset_command(text: &str) -> bool {
    normalize_command(text) == CMD_RESET
}

/// No draft yet: only `expense` opens a conversation
fn start(context: &ConvContext, command: &str) -> TransitionResult {
    if command != CMD_EXPENSE {
        return TransitionResult::new(None).with_reply(messages::ONBOARDING);
    }

    match &context.defaults {
        Some(defaults) => {
            TransitionResult::advance(Draft::new(&context.user_id, DraftStage::AskDefaults))
                .with_reply(messages::START)
                .with_reply(messages::offer_defaults(&defaults.account, &defaults.name))
        }
        None => TransitionResult::advance(Draft::new(&context.user_id, DraftStage::AskAccount))
            .with_reply(messages::START)
            .with_reply(messages::ASK_IBAN),
    }
}
