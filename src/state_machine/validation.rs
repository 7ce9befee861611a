//! Input normalization and validation

use iban::{Iban, IbanLike};

/// Trim surrounding whitespace and lowercase
pub fn normalize_command(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Validate an IBAN typed by a user.
///
/// Whitespace anywhere in the input is ignored and letters are uppercased
/// before validation. Returns the compact canonical form.
pub fn parse_iban(text: &str) -> Option<String> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    compact
        .parse::<Iban>()
        .ok()
        .map(|iban| iban.electronic_str().to_string())
}

/// Interpret a yes/no answer
pub fn parse_yes_no(text: &str) -> Option<bool> {
    match normalize_command(text).as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
