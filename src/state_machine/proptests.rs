//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::db::UserDefaults;
use crate::messages;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

const VALID_IBANS: &[&str] = &[
    "DE89370400440532013000",
    "NL91ABNA0417164300",
    "GB82WEST12345698765432",
    "FR1420041010050500013M02606",
    "BE68539007547034",
];

fn test_context() -> ConvContext {
    ConvContext::new("u1", None)
}

fn replies(result: &TransitionResult) -> Vec<String> {
    result
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::Reply { text } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Group an IBAN in blocks of four, as printed on bank statements
fn print_form(iban: &str) -> String {
    iban.chars()
        .collect::<Vec<_>>()
        .chunks(4)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .]{1,20}"
}

/// Canonical IBAN plus a user-typed rendition of it
fn arb_typed_iban() -> impl Strategy<Value = (String, String)> {
    (prop::sample::select(VALID_IBANS), any::<bool>(), any::<bool>()).prop_map(
        |(iban, spaced, lower)| {
            let mut typed = if spaced {
                print_form(iban)
            } else {
                iban.to_string()
            };
            if lower {
                typed = typed.to_lowercase();
            }
            (iban.to_string(), typed)
        },
    )
}

fn arb_stage() -> impl Strategy<Value = DraftStage> {
    prop_oneof![
        Just(DraftStage::AskDefaults),
        Just(DraftStage::AskAccount),
        arb_field().prop_map(|account| DraftStage::AskName { account }),
        (arb_field(), arb_field()).prop_map(|(account, name)| DraftStage::AskAmount { account, name }),
        (arb_field(), arb_field(), arb_field()).prop_map(|(account, name, amount)| {
            DraftStage::AskDescription {
                account,
                name,
                amount,
            }
        }),
        (arb_field(), arb_field(), arb_field(), arb_field()).prop_map(
            |(account, name, amount, description)| DraftStage::AskFile {
                account,
                name,
                amount,
                description,
            }
        ),
    ]
}

fn arb_ask_file_draft() -> impl Strategy<Value = Draft> {
    (arb_field(), arb_field(), arb_field(), arb_field()).prop_map(
        |(account, name, amount, description)| {
            Draft::new(
                "u1",
                DraftStage::AskFile {
                    account,
                    name,
                    amount,
                    description,
                },
            )
        },
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_valid_iban_advances_to_name((canonical, typed) in arb_typed_iban()) {
        let draft = Draft::new("u1", DraftStage::AskAccount);
        let result = transition(Some(&draft), &test_context(), Event::text(typed)).unwrap();

        let expected = DraftStage::AskName { account: canonical };
        prop_assert_eq!(result.next.as_ref().map(|d| &d.stage), Some(&expected));
        prop_assert_eq!(
            &result.effects[0],
            &Effect::save_draft(Draft::new("u1", expected.clone()))
        );
        prop_assert_eq!(replies(&result), vec![messages::ASK_NAME.to_string()]);
    }

    #[test]
    fn prop_invalid_iban_keeps_state(text in "[a-z ]{0,30}") {
        prop_assume!(text.trim() != "reset");
        let draft = Draft::new("u1", DraftStage::AskAccount);
        let result = transition(Some(&draft), &test_context(), Event::text(text)).unwrap();

        prop_assert_eq!(result.next.as_ref(), Some(&draft));
        prop_assert_eq!(replies(&result), vec![messages::INVALID_IBAN.to_string()]);
        prop_assert_eq!(result.effects.len(), 1);
    }

    #[test]
    fn prop_reset_clears_any_stage(stage in arb_stage(), padding in " {0,3}") {
        let draft = Draft::new("u1", stage);
        let text = format!("{padding}Reset{padding}");
        let result = transition(Some(&draft), &test_context(), Event::text(text)).unwrap();

        prop_assert!(result.next.is_none());
        prop_assert_eq!(
            result.effects,
            vec![Effect::DeleteDraft, Effect::reply(messages::RESTART_HINT)]
        );
    }

    #[test]
    fn prop_wrong_file_count_keeps_ask_file(
        draft in arb_ask_file_draft(),
        files in prop::collection::vec("[a-z0-9]{8}", 0..5),
    ) {
        prop_assume!(files.len() != 1);
        let result = transition(
            Some(&draft),
            &test_context(),
            Event::with_files("", files),
        )
        .unwrap();

        prop_assert_eq!(result.next.as_ref(), Some(&draft));
        let finalized = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Finalize { .. }));
        prop_assert!(!finalized);
        prop_assert_eq!(replies(&result), vec![messages::SINGLE_FILE.to_string()]);
    }

    #[test]
    fn prop_saved_draft_matches_next(stage in arb_stage(), text in "[a-zA-Z0-9 ]{0,20}") {
        let context = ConvContext::new(
            "u1",
            Some(UserDefaults {
                user_id: "u1".to_string(),
                account: "DE89370400440532013000".to_string(),
                name: "Jane Doe".to_string(),
            }),
        );
        let draft = Draft::new("u1", stage);
        let result = transition(Some(&draft), &context, Event::text(text)).unwrap();

        for effect in &result.effects {
            if let Effect::SaveDraft { draft: saved } = effect {
                prop_assert_eq!(&saved.user_id, "u1");
                prop_assert_eq!(Some(saved), result.next.as_ref());
            }
        }
    }

    #[test]
    fn prop_expense_offers_stored_defaults(account in arb_field(), name in arb_field()) {
        let context = ConvContext::new(
            "u1",
            Some(UserDefaults {
                user_id: "u1".to_string(),
                account: account.clone(),
                name: name.clone(),
            }),
        );
        let result = transition(None, &context, Event::text("expense")).unwrap();

        prop_assert_eq!(
            result.next.as_ref().map(|d| &d.stage),
            Some(&DraftStage::AskDefaults)
        );
        prop_assert_eq!(
            replies(&result),
            vec![
                messages::START.to_string(),
                messages::offer_defaults(&account, &name),
            ]
        );
    }
}
