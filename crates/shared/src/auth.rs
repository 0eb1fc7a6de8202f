//! Authentication types for JWT and login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by every authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Tenant the user belongs to.
    pub tenant: Uuid,
    /// User email.
    pub email: String,
    /// User's role within the tenant.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        role: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            tenant: tenant_id,
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the tenant ID from claims.
    #[must_use]
    pub const fn tenant_id(&self) -> Uuid {
        self.tenant
    }
}

/// Login request payload.
///
/// All fields are optional at the wire level so a missing field becomes a
/// validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Tenant to log into.
    pub tenant_id: Option<Uuid>,
    /// User email.
    #[serde(default)]
    pub email: String,
    /// User password.
    #[serde(default)]
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    /// Tenant the new user joins.
    pub tenant_id: Option<Uuid>,
    /// User email.
    #[serde(default)]
    pub email: String,
    /// User password.
    #[serde(default)]
    pub password: String,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Requested role, defaults to `user`.
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);

        let claims = Claims::new(user_id, tenant_id, "a@b.co", "manager", expires_at);

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.tenant_id(), tenant_id);
        assert_eq!(claims.email, "a@b.co");
        assert_eq!(claims.role, "manager");
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_login_request_tolerates_missing_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert!(req.tenant_id.is_none());
        assert_eq!(req.email, "a@b.co");
        assert!(req.password.is_empty());
    }
}
