//! Mapping from domain and repository errors to HTTP responses.
//!
//! Every error body has the shape `{"error": <code>, "message": <text>}`.
//! Storage failures are logged with their detail and answered with a
//! generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use kontor_core::auth::PasswordError;
use kontor_core::inventory::InventoryValidationError;
use kontor_core::ledger::JournalValidationError;
use kontor_db::repositories::{
    AccountError, ContactError, CustomerError, InteractionError, InventoryError, JournalError,
    ProductError, TenantError, UserError,
};
use kontor_shared::{AppError, JwtError};

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// 403 with the given message.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::Forbidden(message.into()))
    }

    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.public_message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<JournalValidationError> for ApiError {
    fn from(err: JournalValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<InventoryValidationError> for ApiError {
    fn from(err: InventoryValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::NotFound(_) => Self::not_found("Journal entry not found"),
            JournalError::Timeout(_) | JournalError::Database(_) => {
                Self(AppError::Database(err.to_string()))
            }
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound(_) => Self::not_found("Product not found"),
            InventoryError::Timeout(_) | InventoryError::Database(_) => {
                Self(AppError::Database(err.to_string()))
            }
        }
    }
}

impl From<TenantError> for ApiError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::DuplicateSubdomain(_) => Self(AppError::Conflict(err.to_string())),
            TenantError::NotFound(_) => Self::not_found("Tenant not found"),
            TenantError::Database(e) => e.into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateEmail(_) => Self(AppError::Conflict(err.to_string())),
            UserError::NotFound(_) => Self::not_found("User not found"),
            UserError::Database(e) => e.into(),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateCode(_) | AccountError::InUse(_) => {
                Self(AppError::Conflict(err.to_string()))
            }
            AccountError::NotFound(_) => Self::not_found("Account not found"),
            AccountError::Database(e) => e.into(),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::DuplicateCode(_) => Self(AppError::Conflict(err.to_string())),
            ProductError::NotFound(_) => Self::not_found("Product not found"),
            ProductError::Database(e) => e.into(),
        }
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(_) => Self::not_found("Customer not found"),
            CustomerError::Database(e) => e.into(),
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::NotFound(_) => Self::not_found("Contact not found"),
            ContactError::CustomerNotFound(_) => Self::not_found("Customer not found"),
            ContactError::Database(e) => e.into(),
        }
    }
}

impl From<InteractionError> for ApiError {
    fn from(err: InteractionError) -> Self {
        match err {
            InteractionError::NotFound(_) => Self::not_found("Interaction not found"),
            InteractionError::CustomerNotFound(_) => Self::not_found("Customer not found"),
            InteractionError::ContactNotFound(_) => Self::not_found("Contact not found"),
            InteractionError::Database(e) => e.into(),
        }
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(JournalError::NotFound(Uuid::nil()).into(), StatusCode::NOT_FOUND)]
    #[case(InventoryError::ProductNotFound(Uuid::nil()).into(), StatusCode::NOT_FOUND)]
    #[case(AccountError::InUse(3).into(), StatusCode::CONFLICT)]
    #[case(UserError::DuplicateEmail("a@b.c".into()).into(), StatusCode::CONFLICT)]
    #[case(
        InventoryError::Timeout(std::time::Duration::from_secs(1)).into(),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case(JournalValidationError::NoLines.into(), StatusCode::BAD_REQUEST)]
    fn test_status_mapping(#[case] error: ApiError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn test_database_detail_is_not_echoed() {
        let err: ApiError = sea_orm::DbErr::Custom("connection refused".into()).into();
        assert_eq!(err.0.public_message(), "Internal server error");
    }
}
