//! Database repository for refresh-token records.
//!
//! Rotation is a single conditional `UPDATE` keyed on the presented token, so
//! SQLite's statement atomicity is what guarantees a token is consumed once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{SessionStore, StoreResult};
use crate::database::models::RefreshToken;
use crate::errors::StoreError;

#[derive(Clone)]
pub struct RefreshTokenRepository {
    pool: SqlitePool,
}

impl RefreshTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for RefreshTokenRepository {
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<RefreshToken> {
        let record = RefreshToken {
            id: Uuid::now_v7().to_string(),
            token: token.to_string(),
            user_id: user_id.to_string(),
            expires_at,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, token, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.token)
        .bind(&record.user_id)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, "Refresh token", "<redacted>"))?;

        Ok(record)
    }

    async fn get_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>> {
        let record = sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT id, token, user_id, expires_at, created_at
            FROM refresh_tokens WHERE token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn rotate_refresh_token(
        &self,
        old_token: &str,
        new_token: &str,
        new_expires_at: DateTime<Utc>,
    ) -> StoreResult<RefreshToken> {
        let rotated = sqlx::query_as::<_, RefreshToken>(
            r#"
            UPDATE refresh_tokens
            SET token = ?, expires_at = ?, created_at = ?
            WHERE token = ?
            RETURNING id, token, user_id, expires_at, created_at
            "#,
        )
        .bind(new_token)
        .bind(new_expires_at)
        .bind(Utc::now())
        .bind(old_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, "Refresh token", "<redacted>"))?;

        rotated.ok_or_else(|| StoreError::not_found("Refresh token", "<redacted>"))
    }

    async fn delete_refresh_token(&self, token: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
