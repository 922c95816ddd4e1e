//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle registration, login, token refreshing and logout.
//! They are designed to be nested under `/auth` in the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/me", get(me).layer(middleware::from_fn(jwt_auth)))
}
