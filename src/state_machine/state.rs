//! Draft state types
//!
//! A draft is the per-user accumulator for an expense that is still being
//! collected. Every stage carries exactly the fields gathered so far, so a
//! transition can only ever write the field it owns.

use crate::db::UserDefaults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// Keys of the persisted `data` map
const DATA_IBAN: &str = "iban";
const DATA_NAME: &str = "name";
const DATA_AMOUNT: &str = "amount";
const DATA_DESCRIPTION: &str = "description";

/// Next input expected from the user, with everything collected before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftStage {
    /// Waiting for a yes/no on reusing the stored account and name
    AskDefaults,
    AskAccount,
    AskName {
        account: String,
    },
    AskAmount {
        account: String,
        name: String,
    },
    AskDescription {
        account: String,
        name: String,
        amount: String,
    },
    AskFile {
        account: String,
        name: String,
        amount: String,
        description: String,
    },
}

impl DraftStage {
    /// Persisted name of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStage::AskDefaults => "ask_defaults",
            DraftStage::AskAccount => "ask_account",
            DraftStage::AskName { .. } => "ask_name",
            DraftStage::AskAmount { .. } => "ask_amount",
            DraftStage::AskDescription { .. } => "ask_description",
            DraftStage::AskFile { .. } => "ask_file",
        }
    }

    fn into_data(self) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            data.insert(key.to_string(), value);
        };
        match self {
            DraftStage::AskDefaults | DraftStage::AskAccount => {}
            DraftStage::AskName { account } => put(DATA_IBAN, account),
            DraftStage::AskAmount { account, name } => {
                put(DATA_IBAN, account);
                put(DATA_NAME, name);
            }
            DraftStage::AskDescription {
                account,
                name,
                amount,
            } => {
                put(DATA_IBAN, account);
                put(DATA_NAME, name);
                put(DATA_AMOUNT, amount);
            }
            DraftStage::AskFile {
                account,
                name,
                amount,
                description,
            } => {
                put(DATA_IBAN, account);
                put(DATA_NAME, name);
                put(DATA_AMOUNT, amount);
                put(DATA_DESCRIPTION, description);
            }
        }
        data
    }
}

/// In-progress expense submission, at most one per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DraftRecord", into = "DraftRecord")]
pub struct Draft {
    pub user_id: String,
    pub stage: DraftStage,
}

impl Draft {
    pub fn new(user_id: impl Into<String>, stage: DraftStage) -> Self {
        Self {
            user_id: user_id.into(),
            stage,
        }
    }

    /// Same user, next stage
    #[must_use]
    pub fn advance(&self, stage: DraftStage) -> Self {
        Self::new(self.user_id.clone(), stage)
    }
}

/// Read-only inputs to a transition, loaded by the caller beforehand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvContext {
    pub user_id: String,
    /// Stored defaults, if the user has completed a submission before
    pub defaults: Option<UserDefaults>,
}

impl ConvContext {
    pub fn new(user_id: impl Into<String>, defaults: Option<UserDefaults>) -> Self {
        Self {
            user_id: user_id.into(),
            defaults,
        }
    }
}

/// A draft with every field collected, ready to become an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub user_id: String,
    pub account: String,
    pub name: String,
    pub amount: String,
    pub description: String,
    pub file_id: String,
}

/// Error decoding a stored draft
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftDecodeError {
    #[error("unknown draft state '{0}'")]
    UnknownState(String),
    #[error("draft in state '{state}' is missing '{field}'")]
    MissingField {
        state: &'static str,
        field: &'static str,
    },
}

/// Persisted shape: `{user_id, state, data: {string -> string}}`
#[derive(Debug, Serialize, Deserialize)]
struct DraftRecord {
    user_id: String,
    state: String,
    #[serde(default)]
    data: BTreeMap<String, String>,
}

impl From<Draft> for DraftRecord {
    fn from(draft: Draft) -> Self {
        Self {
            user_id: draft.user_id,
            state: draft.stage.as_str().to_string(),
            data: draft.stage.into_data(),
        }
    }
}

impl TryFrom<DraftRecord> for Draft {
    type Error = DraftDecodeError;

    fn try_from(mut record: DraftRecord) -> Result<Self, Self::Error> {
        let state = record.state.as_str();
        let mut take = |state: &'static str, field: &'static str| {
            record
                .data
                .remove(field)
                .ok_or(DraftDecodeError::MissingField { state, field })
        };

        let stage = match state {
            "ask_defaults" => DraftStage::AskDefaults,
            "ask_account" => DraftStage::AskAccount,
            "ask_name" => DraftStage::AskName {
                account: take("ask_name", DATA_IBAN)?,
            },
            "ask_amount" => DraftStage::AskAmount {
                account: take("ask_amount", DATA_IBAN)?,
                name: take("ask_amount", DATA_NAME)?,
            },
            "ask_description" => DraftStage::AskDescription {
                account: take("ask_description", DATA_IBAN)?,
                name: take("ask_description", DATA_NAME)?,
                amount: take("ask_description", DATA_AMOUNT)?,
            },
            "ask_file" => DraftStage::AskFile {
                account: take("ask_file", DATA_IBAN)?,
                name: take("ask_file", DATA_NAME)?,
                amount: take("ask_file", DATA_AMOUNT)?,
                description: take("ask_file", DATA_DESCRIPTION)?,
            },
            other => return Err(DraftDecodeError::UnknownState(other.to_string())),
        };

        Ok(Draft {
            user_id: record.user_id,
            stage,
        })
    }
}
