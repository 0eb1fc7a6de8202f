//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every tenant-owned lookup is filtered by tenant id; a row that exists in
//! another tenant is indistinguishable from a missing one.

use std::time::Duration;

use sea_orm::{DbErr, SqlErr};

pub mod account;
pub mod contact;
pub mod customer;
pub mod interaction;
pub mod inventory;
pub mod journal;
pub mod product;
pub mod tenant;
pub mod user;

pub use account::{AccountError, AccountInput, AccountRepository};
pub use contact::{ContactError, ContactInput, ContactRepository};
pub use customer::{CustomerError, CustomerInput, CustomerRepository, CustomerWithContacts};
pub use interaction::{InteractionError, InteractionInput, InteractionRepository};
pub use inventory::{
    CreateInventoryTransactionInput, InventoryError, InventoryTransactionRepository,
};
pub use journal::{
    CreateJournalEntryInput, JournalEntryRepository, JournalEntryWithLines, JournalError,
    JournalLineInput, UpdateJournalEntryInput,
};
pub use product::{ProductError, ProductInput, ProductRepository};
pub use tenant::{TenantError, TenantInput, TenantRepository};
pub use user::{CreateUserInput, UpdateUserInput, UserError, UserRepository};

/// Bound applied to multi-statement writes unless overridden.
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Maps a unique-constraint violation to `duplicate()` and any other error
/// through `From<DbErr>`.
///
/// The lookup done before a write can race with a concurrent writer; the
/// unique index has the final word.
pub(crate) fn on_unique_violation<E: From<DbErr>>(
    err: DbErr,
    duplicate: impl FnOnce() -> E,
) -> E {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        duplicate()
    } else {
        E::from(err)
    }
}
