//! Expense status rendering
//!
//! Pure functions: everything that needs I/O (attachment metadata, the
//! submitter's profile) is looked up by the caller and passed in.

use crate::chat::{ActionStyle, FileInfo, PostAction, UserProfile};
use crate::config::Config;
use crate::db::{Expense, ExpenseState};

/// Icon and label shown in the status row
pub fn status_badge(state: ExpenseState) -> &'static str {
    match state {
        ExpenseState::Submitted => ":hourglass_flowing_sand: **Submitted**",
        ExpenseState::Paid => ":white_check_mark: **Paid**",
        ExpenseState::Rejected => ":x: **Rejected**",
    }
}

/// Download link for an attachment
pub fn file_url(site_url: &str, file_id: &str) -> String {
    format!("{site_url}/api/v4/files/{file_id}")
}

/// Markdown status table for an expense
pub fn format_expense(expense: &Expense, file: &FileInfo, site_url: &str) -> String {
    format!(
        "|Status|{}|\n|-|-|\n|Bank account|{}|\n|Name|{}|\n|Amount|{}|\n|Description|{}|\n|File|[{}]({})|\n",
        status_badge(expense.state),
        expense.account,
        expense.name,
        expense.amount,
        expense.description,
        file.name,
        file_url(site_url, &file.id),
    )
}

/// Shared-channel announcement: submitter heading plus the status table
pub fn channel_message(submitter: &UserProfile, table: &str) -> String {
    format!(
        "**Expense claim from {} {}**\n\n{table}",
        submitter.first_name, submitter.last_name
    )
}

/// Paid / Reject buttons pointing back at the callback endpoint
pub fn approval_actions(config: &Config, expense_id: &str) -> Vec<PostAction> {
    vec![
        PostAction {
            id: "paid".to_string(),
            name: "Paid".to_string(),
            style: ActionStyle::Success,
            url: config.callback_url(expense_id, ExpenseState::Paid.as_str()),
        },
        PostAction {
            id: "reject".to_string(),
            name: "Reject".to_string(),
            style: ActionStyle::Danger,
            url: config.callback_url(expense_id, ExpenseState::Rejected.as_str()),
        },
    ]
}
