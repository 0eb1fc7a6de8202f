//! Journal entry input rules.
//!
//! The ledger writer trusts its input; these checks run in the handler
//! layer first. Debits and credits are not required to balance.

mod validation;

#[cfg(test)]
mod validation_props;

pub use validation::{JournalValidationError, LineAmounts, validate_journal};
