//! Core business logic for the authentication system.
//!
//! Every refresh token belongs to a lineage that moves
//! `issued -> rotated -> issued -> ... -> expired | revoked`. A token value is
//! single-use: presenting it either rotates it into a new value or ends the
//! lineage, and the store's conditional rotation makes sure only one caller
//! can win that race.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::models::*;
use crate::config::AuthConfig;
use crate::database::models::{CreateUser, DEFAULT_ROLE, RefreshToken};
use crate::errors::{ServiceError, ServiceResult, StoreError};
use crate::repositories::{SessionStore, UserStore};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::PasswordHasher;
use crate::utils::refresh_token::generate_refresh_token;

/// How many fresh values to try when a generated refresh token collides.
const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Hashed once at startup so an unknown email costs one bcrypt verify too.
const TIMING_DUMMY_PASSWORD: &str = "apiprofile-timing-dummy";

/// Authentication service for registration, login, token refresh and logout
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    jwt_utils: Arc<JwtUtils>,
    hasher: PasswordHasher,
    dummy_hash: String,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        jwt_utils: Arc<JwtUtils>,
        config: AuthConfig,
    ) -> Self {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        // An unusable cost also fails every registration, so an empty hash is fine here.
        let dummy_hash = hasher
            .hash_password(TIMING_DUMMY_PASSWORD)
            .unwrap_or_default();
        AuthService {
            users,
            sessions,
            jwt_utils,
            hasher,
            dummy_hash,
            config,
        }
    }

    /// Register a new account with the default role. No tokens are issued.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserInfo> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash_password(&request.password)?;

        let user = self
            .users
            .create(CreateUser {
                name: request.name,
                email: request.email,
                password_hash,
                role: DEFAULT_ROLE.to_string(),
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration for the same email.
                StoreError::Conflict { .. } => ServiceError::DuplicateEmail,
                other => other.into(),
            })?;

        info!(user_id = %user.id, "Registered new user");
        Ok(user.into())
    }

    /// Authenticate a user and issue an access/refresh token pair
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        let user = self.users.find_by_email(&request.email).await?;
        let password_hash = user
            .as_ref()
            .map_or(self.dummy_hash.as_str(), |user| user.password_hash.as_str());
        let password_ok = self.hasher.verify_password(&request.password, password_hash);

        let user = match user {
            Some(user) if password_ok => user,
            _ => {
                warn!("Rejected login attempt");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let access_token = self.jwt_utils.issue_access_token(
            &user.id,
            &user.email,
            &user.role,
            self.config.access_token_ttl,
        )?;

        let record = self.create_refresh_token(&user.id).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse {
            tokens: AuthResponse::bearer(access_token, record.token, self.expires_in()),
            user: user.into(),
        })
    }

    /// Exchange a refresh token for a new access/refresh pair
    pub async fn refresh(&self, refresh_token: &str) -> ServiceResult<AuthResponse> {
        let record = self
            .sessions
            .get_refresh_token(refresh_token)
            .await?
            .ok_or(ServiceError::InvalidRefreshToken)?;

        if record.is_expired_at(Utc::now()) {
            self.sessions.delete_refresh_token(refresh_token).await?;
            info!(user_id = %record.user_id, "Expired refresh token removed");
            return Err(ServiceError::ExpiredRefreshToken);
        }

        let user = match self.users.find_by_id(&record.user_id).await? {
            Some(user) => user,
            None => {
                warn!(user_id = %record.user_id, "Refresh token owner no longer exists");
                return Err(ServiceError::InvalidRefreshToken);
            }
        };

        let access_token = self.jwt_utils.issue_access_token(
            &user.id,
            &user.email,
            &user.role,
            self.config.access_token_ttl,
        )?;

        let rotated = self.rotate_refresh_token(refresh_token).await?;

        info!(user_id = %user.id, "Refresh token rotated");
        Ok(AuthResponse::bearer(
            access_token,
            rotated.token,
            self.expires_in(),
        ))
    }

    /// Revoke a refresh token. Unknown or already-used tokens are ignored.
    pub async fn logout(&self, refresh_token: &str) -> ServiceResult<()> {
        self.sessions.delete_refresh_token(refresh_token).await?;
        Ok(())
    }

    fn expires_in(&self) -> i64 {
        self.config.access_token_ttl.num_seconds()
    }

    fn refresh_expiry(&self) -> ServiceResult<DateTime<Utc>> {
        Utc::now()
            .checked_add_signed(self.config.refresh_token_ttl)
            .ok_or_else(|| ServiceError::configuration("refresh token lifetime out of range"))
    }

    async fn create_refresh_token(&self, user_id: &str) -> ServiceResult<RefreshToken> {
        let mut last_error = None;

        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = generate_refresh_token();
            let expires_at = self.refresh_expiry()?;

            match self
                .sessions
                .create_refresh_token(&token, user_id, expires_at)
                .await
            {
                Ok(record) => return Ok(record),
                Err(e @ StoreError::Conflict { .. }) => {
                    warn!(user_id, "Refresh token collision, regenerating");
                    last_error = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_error
            .unwrap_or_else(|| StoreError::conflict("Refresh token", "<redacted>"))
            .into())
    }

    async fn rotate_refresh_token(&self, old_token: &str) -> ServiceResult<RefreshToken> {
        let mut last_error = None;

        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let new_token = generate_refresh_token();
            let new_expires_at = self.refresh_expiry()?;

            match self
                .sessions
                .rotate_refresh_token(old_token, &new_token, new_expires_at)
                .await
            {
                Ok(record) => return Ok(record),
                // Someone else consumed the token between lookup and rotation.
                Err(StoreError::NotFound { .. }) => {
                    warn!("Refresh token already consumed");
                    return Err(ServiceError::InvalidRefreshToken);
                }
                Err(e @ StoreError::Conflict { .. }) => {
                    warn!("Refresh token collision, regenerating");
                    last_error = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_error
            .unwrap_or_else(|| StoreError::conflict("Refresh token", "<redacted>"))
            .into())
    }
}
