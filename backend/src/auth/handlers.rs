//! Handler functions for authentication-related API endpoints.
//!
//! These functions validate incoming payloads and hand them to
//! `auth::service`, which owns the actual authentication rules.

use crate::api::AppState;
use crate::api::common::{ApiError, ApiResponse, service_error_to_http, validation_error_response};
use crate::auth::models::*;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
};
use validator::Validate;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    payload.validate().map_err(validation_error_response)?;

    let user = state
        .auth_service
        .register(payload)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user, "User registered successfully")),
    ))
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    payload.validate().map_err(validation_error_response)?;

    let response = state
        .auth_service
        .login(payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(response, "Login successful")))
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    payload.validate().map_err(validation_error_response)?;

    let response = state
        .auth_service
        .refresh(&payload.refresh_token)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(response, "Token refreshed")))
}

/// Handle logout request by revoking the presented refresh token
#[axum::debug_handler]
pub async fn logout(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    payload.validate().map_err(validation_error_response)?;

    state
        .auth_service
        .logout(&payload.refresh_token)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success((), "Logged out successfully")))
}

/// Get the identity carried by the caller's access token
#[axum::debug_handler]
pub async fn me(Extension(claims): Extension<Claims>) -> Json<ApiResponse<Claims>> {
    Json(ApiResponse::ok(claims))
}
