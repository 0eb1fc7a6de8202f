//! Property-based tests for journal entry validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::validation::{JournalValidationError, LineAmounts, validate_journal};

/// Non-negative amount with two decimal places.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strictly negative amount with two decimal places.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

fn valid_line() -> impl Strategy<Value = LineAmounts> {
    (amount(), amount()).prop_map(|(debit, credit)| LineAmounts {
        account_id: Some(Uuid::new_v4()),
        debit,
        credit,
    })
}

fn entry_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any dated entry with at least one well-formed line passes, balanced or not.
    #[test]
    fn prop_well_formed_entries_pass(lines in prop::collection::vec(valid_line(), 1..20)) {
        prop_assert_eq!(validate_journal(Some(entry_date()), &lines), Ok(entry_date()));
    }

    /// A negative amount anywhere is reported at its one-based position.
    #[test]
    fn prop_negative_amount_rejected(
        mut lines in prop::collection::vec(valid_line(), 1..10),
        bad in negative_amount(),
        pick in any::<prop::sample::Index>(),
        on_debit in any::<bool>(),
    ) {
        let idx = pick.index(lines.len());
        if on_debit {
            lines[idx].debit = bad;
        } else {
            lines[idx].credit = bad;
        }

        prop_assert_eq!(
            validate_journal(Some(entry_date()), &lines),
            Err(JournalValidationError::NegativeAmount { line: idx + 1 })
        );
    }

    /// The date check wins over every line-level problem.
    #[test]
    fn prop_missing_date_checked_first(lines in prop::collection::vec(valid_line(), 0..5)) {
        prop_assert_eq!(
            validate_journal(None, &lines),
            Err(JournalValidationError::MissingEntryDate)
        );
    }
}
