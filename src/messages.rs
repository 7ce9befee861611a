//! User-facing message texts

// Conversation start
pub const ONBOARDING: &str =
    "Hi! I'm ExpenseBot, I'll help you submit an expense. Type ```expense``` to start a new expense.";
pub const START: &str =
    "Let's start the expense, shall we? If you change your mind, type ```reset``` and it will all be over.";

// Questions
pub const ASK_IBAN: &str = "**What is your IBAN?**";
pub const ASK_NAME: &str = "**In what name is the account held?**";
pub const ASK_AMOUNT: &str = "**What is the amount of the expense?** (e.g. 100.00)\n\nIf you combine multiple receipts, fill in the total amount.";
pub const ASK_DESCRIPTION: &str = "**In a few words, describe the expense.**";
pub const ASK_FILE: &str = "**Upload the invoice or a picture of the receipt.**\n\nYou can drag 'n' drop a file into the chat window, or use the paperclip in the bottom right corner.\n\nIf you have multiple receipts, take a single picture of all the receipts.";

// Defaults
pub const DEFAULTS_ACCEPTED: &str =
    "Amazing, look at us being efficient! I will fill that in for you, let's start with the amount.";
pub const DEFAULTS_DECLINED: &str = "No problem, let's start from the beginning.";
pub const YES_OR_NO: &str = "Please answer with yes or no. Just the first letter is enough.";

// Validation
pub const INVALID_IBAN: &str = "Invalid IBAN. Please try again.";
pub const SINGLE_FILE: &str = "Submit a single file.";

// Completion
pub const SAVED: &str = "**Expense saved! :tada:**";
pub const RESTART_HINT: &str = "Type ```expense``` to start a new expense.";

// Errors
pub const SYSTEM_ERROR: &str =
    "System error, please try again or type ```reset``` to stop the expense.";

/// Offer to reuse the account details from the previous submission
pub fn offer_defaults(account: &str, name: &str) -> String {
    format!(
        "Last time you used account **{account}** and name **{name}**. Do you want to use them again? (y[es]/n[o])"
    )
}
