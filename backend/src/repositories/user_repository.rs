//! Database repository for user management operations.
//!
//! Provides CRUD operations for system users

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{StoreResult, UserStore};
use crate::database::models::{CreateUser, User};
use crate::errors::StoreError;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    /// Shared SQLite connection pool
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool (cheap to clone)
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Creates a new user in the database.
    ///
    /// # Returns
    /// The newly created User with a fresh id and timestamps
    async fn create(&self, user: CreateUser) -> StoreResult<User> {
        let now = Utc::now();
        let created = User {
            id: Uuid::now_v7().to_string(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&created.id)
        .bind(&created.name)
        .bind(&created.email)
        .bind(&created.password_hash)
        .bind(&created.role)
        .bind(created.created_at)
        .bind(created.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, "User with email", &created.email))?;

        Ok(created)
    }

    /// Retrieves a user by their email.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> StoreResult<User> {
        let mut updated = user.clone();
        updated.updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, password_hash = ?, role = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&updated.name)
        .bind(&updated.email)
        .bind(&updated.password_hash)
        .bind(&updated.role)
        .bind(updated.updated_at)
        .bind(&updated.id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, "User with email", &updated.email))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", &updated.id));
        }

        Ok(updated)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::database::models::DEFAULT_ROLE;

    async fn repo() -> UserRepository {
        let db = Database::in_memory().await.unwrap();
        UserRepository::new(db.pool.clone())
    }

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            name: "Ann".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: DEFAULT_ROLE.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo().await;
        let created = repo.create(new_user("ann@x.com")).await.unwrap();

        let by_email = repo.find_by_email("ann@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.role, "user");

        let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ann@x.com");
    }

    #[tokio::test]
    async fn test_absent_user_is_none_not_error() {
        let repo = repo().await;
        assert!(repo.find_by_email("noone@x.com").await.unwrap().is_none());
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = repo().await;
        repo.create(new_user("ann@x.com")).await.unwrap();

        let err = repo.create(new_user("ann@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = repo().await;
        let mut user = repo.create(new_user("ann@x.com")).await.unwrap();

        user.name = "Annie".to_string();
        user.role = "admin".to_string();
        let updated = repo.update(&user).await.unwrap();
        assert!(updated.updated_at >= user.created_at);

        let stored = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Annie");
        assert_eq!(stored.role, "admin");
        assert_eq!(repo.list().await.unwrap().len(), 1);

        repo.delete(&user.id).await.unwrap();
        assert!(repo.find_by_id(&user.id).await.unwrap().is_none());

        let err = repo.delete(&user.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
