//! Presence and range validation for journal entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for a journal entry request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JournalValidationError {
    /// Entry has no date.
    #[error("Entry date is required")]
    MissingEntryDate,

    /// Entry has no lines.
    #[error("At least one journal entry line is required")]
    NoLines,

    /// A line does not reference an account.
    #[error("Line {line}: account ID is required")]
    MissingAccount {
        /// One-based line position.
        line: usize,
    },

    /// A line carries a negative debit or credit.
    #[error("Line {line}: debit and credit must not be negative")]
    NegativeAmount {
        /// One-based line position.
        line: usize,
    },
}

/// The parts of a journal line that validation looks at.
#[derive(Debug, Clone, Copy)]
pub struct LineAmounts {
    /// Referenced account.
    pub account_id: Option<Uuid>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Validates a journal entry request.
///
/// Returns the entry date on success.
///
/// # Errors
///
/// Returns the first rule the input breaks, checked in order: date,
/// line count, then each line top to bottom.
pub fn validate_journal(
    entry_date: Option<NaiveDate>,
    lines: &[LineAmounts],
) -> Result<NaiveDate, JournalValidationError> {
    let entry_date = entry_date.ok_or(JournalValidationError::MissingEntryDate)?;

    if lines.is_empty() {
        return Err(JournalValidationError::NoLines);
    }

    for (idx, line) in lines.iter().enumerate() {
        let position = idx + 1;
        if line.account_id.is_none_or(|id| id.is_nil()) {
            return Err(JournalValidationError::MissingAccount { line: position });
        }
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(JournalValidationError::NegativeAmount { line: position });
        }
    }

    Ok(entry_date)
}
