//! Core business rules for Kontor.
//!
//! This crate contains pure logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `auth` - Password hashing and user roles
//! - `ledger` - Journal entry input rules
//! - `inventory` - Stock movement kinds and the signed stock delta

pub mod auth;
pub mod inventory;
pub mod ledger;
