//! Central module for organizing the application's HTTP surface.
//!
//! `AppState` is built once at startup and shared with every handler through
//! an `Extension` layer; it carries no mutable state.

use axum::{Extension, Json, Router, routing::get};
use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AuthConfig;
use crate::repositories::{SessionStore, UserStore};
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::PasswordHasher;
use common::ApiResponse;

pub mod common;
pub mod user;

/// Services shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub jwt_utils: Arc<JwtUtils>,
}

impl AppState {
    /// Wires the services over the given stores and configuration.
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        config: AuthConfig,
    ) -> Self {
        let jwt_utils = Arc::new(JwtUtils::new(&config.jwt_secret));
        let hasher = PasswordHasher::new(config.bcrypt_cost);

        let user_service = Arc::new(UserService::new(users.clone(), hasher));
        let auth_service = Arc::new(AuthService::new(
            users,
            sessions,
            jwt_utils.clone(),
            config,
        ));

        Self {
            auth_service,
            user_service,
            jwt_utils,
        }
    }
}

/// Builds the complete application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/auth", crate::auth::routes::auth_router())
        .nest("/users", user::routes::user_router())
        .layer(Extension(state))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "apiprofile",
            "version": env!("CARGO_PKG_VERSION")
        }),
        "Welcome to the apiprofile API",
    ))
}
