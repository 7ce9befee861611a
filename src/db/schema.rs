//! Database schema and record types

pub use crate::state_machine::state::{Draft, DraftStage, Submission};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// SQL schema for initialization
///
/// One flat key space; every record is a JSON document under a key
/// namespaced by entity kind.
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at TEXT NOT NULL
);
";

const USER_PREFIX: &str = "user:";
const DRAFT_PREFIX: &str = "draft:";
const EXPENSE_PREFIX: &str = "expense:";

pub fn user_key(user_id: &str) -> String {
    format!("{USER_PREFIX}{user_id}")
}

pub fn draft_key(user_id: &str) -> String {
    format!("{DRAFT_PREFIX}{user_id}")
}

pub fn expense_key(expense_id: &str) -> String {
    format!("{EXPENSE_PREFIX}{expense_id}")
}

/// Approval lifecycle of a submitted expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseState {
    Submitted,
    Paid,
    Rejected,
}

impl ExpenseState {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseState::Submitted => "Submitted",
            ExpenseState::Paid => "Paid",
            ExpenseState::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ExpenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown expense state '{0}'")]
pub struct UnknownExpenseState(pub String);

impl FromStr for ExpenseState {
    type Err = UnknownExpenseState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Submitted" => Ok(ExpenseState::Submitted),
            "Paid" => Ok(ExpenseState::Paid),
            "Rejected" => Ok(ExpenseState::Rejected),
            other => Err(UnknownExpenseState(other.to_string())),
        }
    }
}

/// Finalized expense claim
///
/// Only `state` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// Private status message shown to the submitter
    pub post_id: String,
    pub user_id: String,
    pub state: ExpenseState,
    #[serde(rename = "bank_account")]
    pub account: String,
    pub name: String,
    pub amount: String,
    pub description: String,
    pub file_ids: Vec<String>,
}

impl Expense {
    /// New expense in `Submitted` state; `post_id` is assigned once the
    /// status message exists.
    pub fn submitted(id: impl Into<String>, submission: Submission) -> Self {
        Self {
            id: id.into(),
            post_id: String::new(),
            user_id: submission.user_id,
            state: ExpenseState::Submitted,
            account: submission.account,
            name: submission.name,
            amount: submission.amount,
            description: submission.description,
            file_ids: vec![submission.file_id],
        }
    }

    pub fn file_id(&self) -> Option<&str> {
        self.file_ids.first().map(String::as_str)
    }
}

/// Last-used account details, offered again on the next submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDefaults {
    pub user_id: String,
    #[serde(rename = "bank_account")]
    pub account: String,
    pub name: String,
}
