//! Persistence contracts and their SQLite implementations.
//!
//! The services depend only on the `UserStore` and `SessionStore` traits, so
//! any backend (or a test double) can stand in for the SQLite repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::{CreateUser, RefreshToken, User};
use crate::errors::StoreError;

pub mod refresh_token_repository;
pub mod user_repository;

pub use refresh_token_repository::RefreshTokenRepository;
pub use user_repository::UserRepository;

pub type StoreResult<T> = Result<T, StoreError>;

/// Capability over user records.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// genuine storage failures.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user, failing with `StoreError::Conflict` on a taken email.
    async fn create(&self, user: CreateUser) -> StoreResult<User>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;

    /// Persists every mutable field of `user` and bumps `updated_at`.
    async fn update(&self, user: &User) -> StoreResult<User>;

    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Removes a user, failing with `StoreError::NotFound` if absent.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Capability over refresh-token records.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a record, failing with `StoreError::Conflict` if the value exists.
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<RefreshToken>;

    async fn get_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>>;

    /// Atomically replaces `old_token` with `new_token`.
    ///
    /// Fails with `StoreError::NotFound` when `old_token` has already been
    /// consumed, and with `StoreError::Conflict` (leaving the old record
    /// untouched) when `new_token` is taken.
    async fn rotate_refresh_token(
        &self,
        old_token: &str,
        new_token: &str,
        new_expires_at: DateTime<Utc>,
    ) -> StoreResult<RefreshToken>;

    /// Removes a record. Deleting an absent token is not an error.
    async fn delete_refresh_token(&self, token: &str) -> StoreResult<()>;
}
