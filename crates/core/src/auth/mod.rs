//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - User role definitions

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// User roles within a tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform operator; manages tenants.
    Admin,
    /// Manages users inside a tenant.
    Manager,
    /// Regular member.
    #[default]
    User,
}

/// Returned when a role string is not one of the known roles.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl UserRole {
    /// Returns true if this role can create, edit and delete tenants.
    #[must_use]
    pub const fn can_manage_tenants(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if a user may pick this role for themselves at sign-up.
    #[must_use]
    pub const fn is_self_assignable(&self) -> bool {
        !matches!(self, Self::Admin)
    }

    /// Returns the role as stored in the database and in tokens.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "user" => Ok(Self::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", UserRole::Admin)]
    #[case("manager", UserRole::Manager)]
    #[case("user", UserRole::User)]
    fn test_role_round_trips_through_str(#[case] raw: &str, #[case] role: UserRole) {
        assert_eq!(raw.parse::<UserRole>().unwrap(), role);
        assert_eq!(role.to_string(), raw);
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert_eq!(
            "Admin".parse::<UserRole>(),
            Err(UnknownRole("Admin".to_string()))
        );
    }

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.can_manage_tenants());
        assert!(!UserRole::Manager.can_manage_tenants());
        assert!(!UserRole::User.can_manage_tenants());

        assert!(!UserRole::Admin.is_self_assignable());
        assert!(UserRole::Manager.is_self_assignable());
        assert_eq!(UserRole::default(), UserRole::User);
    }
}
