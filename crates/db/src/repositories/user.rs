//! User repository for database operations.
//!
//! Emails are unique per tenant, not globally.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::users;
use crate::repositories::on_unique_violation;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered in the tenant.
    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Tenant the user belongs to.
    pub tenant_id: Uuid,
    /// Login email.
    pub email: String,
    /// Argon2 PHC hash, never the plaintext.
    pub password_hash: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Role name.
    pub role: String,
}

/// Input for updating a user.
///
/// `password_hash` is only written when present.
#[derive(Debug, Clone)]
pub struct UpdateUserInput {
    /// Login email.
    pub email: String,
    /// New password hash, if the password changes.
    pub password_hash: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Role name.
    pub role: String,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a tenant's users ordered by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .order_by_asc(users::Column::Email)
            .all(&self.db)
            .await
    }

    /// Finds a user by ID within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .filter(users::Column::Id.eq(id))
            .one(&self.db)
            .await
    }

    /// Finds a user by email within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(
        &self,
        tenant_id: Uuid,
        email: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::DuplicateEmail` if the email exists in the tenant.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        if self.email_exists(input.tenant_id, &input.email, None).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let email = input.email.clone();
        let user = users::ActiveModel {
            tenant_id: Set(input.tenant_id),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            role: Set(input.role),
            ..Default::default()
        };

        user
            .insert(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, || UserError::DuplicateEmail(email)))
    }

    /// Updates a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is missing or the new email is taken.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<users::Model, UserError> {
        let user = self
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if input.email != user.email
            && self.email_exists(tenant_id, &input.email, Some(id)).await?
        {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let email = input.email.clone();
        let mut active: users::ActiveModel = user.into();
        active.email = Set(input.email);
        active.first_name = Set(input.first_name);
        active.last_name = Set(input.last_name);
        active.role = Set(input.role);
        if let Some(hash) = input.password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, || UserError::DuplicateEmail(email)))
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no user matches the tenant and id.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), UserError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::TenantId.eq(tenant_id))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Checks if an email is already registered in a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(
        &self,
        tenant_id: Uuid,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .filter(users::Column::Email.eq(email));
        if let Some(id) = exclude {
            query = query.filter(users::Column::Id.ne(id));
        }

        Ok(query.count(&self.db).await? > 0)
    }
}
