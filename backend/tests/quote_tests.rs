//! Quote lifecycle tests
//!
//! Covers the quote status machine and the month-scoped quote numbering.

use chrono::NaiveDate;
use proptest::prelude::*;

use shared::{format_quote_number, quote_series, QuoteAction, QuoteStatus};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// New quotes start as drafts
    #[test]
    fn test_quotes_start_as_draft() {
        assert_eq!(QuoteStatus::default(), QuoteStatus::Draft);
    }

    /// The happy path walks draft -> sent -> accepted
    #[test]
    fn test_happy_path_transitions() {
        let mut status = QuoteStatus::Draft;

        let next = QuoteAction::Send.target_status();
        assert!(status.can_transition_to(next));
        status = next;

        let next = QuoteAction::Accept.target_status();
        assert!(status.can_transition_to(next));
        status = next;

        assert_eq!(status, QuoteStatus::Accepted);
    }

    /// A sent quote may be re-sent
    #[test]
    fn test_resending_is_allowed() {
        assert!(QuoteStatus::Sent.can_transition_to(QuoteStatus::Sent));
    }

    /// Terminal statuses accept no further actions
    #[test]
    fn test_terminal_statuses_are_final() {
        for terminal in [
            QuoteStatus::Accepted,
            QuoteStatus::Rejected,
            QuoteStatus::Expired,
        ] {
            for action in [QuoteAction::Send, QuoteAction::Accept, QuoteAction::Reject] {
                assert!(
                    !terminal.can_transition_to(action.target_status()),
                    "{:?} should not accept {:?}",
                    terminal,
                    action
                );
            }
        }
    }

    /// A draft cannot be accepted or rejected directly
    #[test]
    fn test_draft_must_be_sent_first() {
        assert!(!QuoteStatus::Draft.can_transition_to(QuoteStatus::Accepted));
        assert!(!QuoteStatus::Draft.can_transition_to(QuoteStatus::Rejected));
    }

    /// Quote series encodes the year and month of creation
    #[test]
    fn test_quote_series_format() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(quote_series(date), "COT-202406");

        let january = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(quote_series(january), "COT-202501");
    }

    /// Quote numbers are the series plus a four-digit counter
    #[test]
    fn test_quote_number_format() {
        assert_eq!(format_quote_number("COT-202406", 1), "COT-202406-0001");
        assert_eq!(format_quote_number("COT-202406", 42), "COT-202406-0042");
        assert_eq!(format_quote_number("COT-202406", 12345), "COT-202406-12345");
    }

    /// Status strings stored in the database round-trip
    #[test]
    fn test_quote_status_round_trip() {
        for status in [
            QuoteStatus::Draft,
            QuoteStatus::Sent,
            QuoteStatus::Accepted,
            QuoteStatus::Rejected,
            QuoteStatus::Expired,
        ] {
            assert_eq!(QuoteStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(QuoteStatus::parse("open"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = QuoteStatus> {
        prop_oneof![
            Just(QuoteStatus::Draft),
            Just(QuoteStatus::Sent),
            Just(QuoteStatus::Accepted),
            Just(QuoteStatus::Rejected),
            Just(QuoteStatus::Expired),
        ]
    }

    fn action_strategy() -> impl Strategy<Value = QuoteAction> {
        prop_oneof![
            Just(QuoteAction::Send),
            Just(QuoteAction::Accept),
            Just(QuoteAction::Reject),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// No action ever produces Draft or Expired
        #[test]
        fn prop_actions_never_target_draft_or_expired(action in action_strategy()) {
            let target = action.target_status();
            prop_assert_ne!(target, QuoteStatus::Draft);
            prop_assert_ne!(target, QuoteStatus::Expired);
        }

        /// Accept and reject are only reachable from Sent
        #[test]
        fn prop_decisions_require_sent(status in status_strategy()) {
            let can_accept = status.can_transition_to(QuoteStatus::Accepted);
            let can_reject = status.can_transition_to(QuoteStatus::Rejected);
            prop_assert_eq!(can_accept, status == QuoteStatus::Sent);
            prop_assert_eq!(can_reject, status == QuoteStatus::Sent);
        }

        /// Any legal sequence of actions stays within the reachable statuses
        #[test]
        fn prop_reachable_statuses(
            actions in prop::collection::vec(action_strategy(), 0..10)
        ) {
            let mut status = QuoteStatus::Draft;
            for action in actions {
                let next = action.target_status();
                if status.can_transition_to(next) {
                    status = next;
                }
            }
            // Expired is never produced by actions
            prop_assert_ne!(status, QuoteStatus::Expired);
        }

        /// Quote numbers preserve their series prefix
        #[test]
        fn prop_quote_number_keeps_series(
            year in 2020i32..2100,
            month in 1u32..=12,
            n in 1i64..100000
        ) {
            let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let series = quote_series(date);
            let number = format_quote_number(&series, n);
            prop_assert!(number.starts_with(&series));
        }
    }
}
