//! User business logic service.
//!
//! Plain CRUD over user records for the protected `/users` routes. Password
//! changes go through the same hasher as registration.

use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::auth::models::UserInfo;
use crate::database::models::{CreateUser, DEFAULT_ROLE};
use crate::errors::{ServiceError, ServiceResult, StoreError};
use crate::repositories::UserStore;
use crate::utils::password::PasswordHasher;

/// Payload for creating a user on behalf of an authenticated caller
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1-255 characters"
    ))]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub role: Option<String>,
}

/// Partial update; empty or absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 255, message = "Name too long"))]
    pub name: Option<String>,

    #[validate(email(message = "Must be a valid email"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    pub role: Option<String>,
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl UserService {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `users` - User store
    /// * `hasher` - Password hasher shared with the authentication core
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// Creates a new user.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - An email that is already registered
    /// - Password hashing failures
    pub async fn create_user(&self, request: CreateUserRequest) -> ServiceResult<UserInfo> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash_password(&request.password)?;
        let role = non_empty(request.role).unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let user = self
            .users
            .create(CreateUser {
                name: request.name,
                email: request.email,
                password_hash,
                role,
            })
            .await
            .map_err(duplicate_email_on_conflict)?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user.into())
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<UserInfo>> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(UserInfo::from).collect())
    }

    /// Retrieves a user by ID with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<UserInfo> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user.into())
    }

    /// Applies a partial update to a user.
    pub async fn update_user(
        &self,
        id: &str,
        request: UpdateUserRequest,
    ) -> ServiceResult<UserInfo> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;

        if let Some(name) = non_empty(request.name) {
            user.name = name;
        }
        if let Some(email) = non_empty(request.email) {
            user.email = email;
        }
        if let Some(role) = non_empty(request.role) {
            user.role = role;
        }
        if let Some(password) = non_empty(request.password) {
            user.password_hash = self.hasher.hash_password(&password)?;
        }

        let user = self.users.update(&user).await.map_err(|e| match e {
            StoreError::NotFound { .. } => ServiceError::not_found("User", id),
            other => duplicate_email_on_conflict(other),
        })?;

        tracing::info!(user_id = %user.id, "User updated");
        Ok(user.into())
    }

    /// Deletes a user; its refresh tokens go with it.
    pub async fn delete_user(&self, id: &str) -> ServiceResult<()> {
        self.users.delete(id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => ServiceError::not_found("User", id),
            other => other.into(),
        })?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn duplicate_email_on_conflict(error: StoreError) -> ServiceError {
    match error {
        StoreError::Conflict { .. } => ServiceError::DuplicateEmail,
        other => other.into(),
    }
}
