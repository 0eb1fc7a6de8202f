//! `SeaORM` entity definitions, one module per table.

pub mod accounts;
pub mod contacts;
pub mod customers;
pub mod interactions;
pub mod inventory_transactions;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod products;
pub mod tenants;
pub mod users;
