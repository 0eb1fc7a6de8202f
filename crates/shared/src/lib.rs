//! Shared types, errors, and configuration for Kontor.
//!
//! This crate provides the pieces every other crate leans on:
//! - Application-wide error taxonomy
//! - Configuration loading
//! - JWT claims and the token service
//! - Authentication request payloads

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

#[cfg(test)]
mod config_tests;

pub use auth::{Claims, LoginRequest, RegisterRequest};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
