//! Handler functions for user management API endpoints.

use crate::api::AppState;
use crate::api::common::{ApiError, ApiResponse, service_error_to_http, validation_error_response};
use crate::auth::models::UserInfo;
use crate::services::user_service::{CreateUserRequest, UpdateUserRequest};
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use validator::Validate;

/// Creates a user.
#[axum::debug_handler]
pub async fn create_user(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    payload.validate().map_err(validation_error_response)?;

    tracing::info!("Creating user on behalf of {}", claims.sub);

    let user = state
        .user_service
        .create_user(payload)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user, "User created successfully")),
    ))
}

/// Lists all users.
#[axum::debug_handler]
pub async fn list_users(
    Extension(state): Extension<AppState>,
) -> Result<Json<ApiResponse<Vec<UserInfo>>>, ApiError> {
    let users = state
        .user_service
        .list_users()
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(
        users,
        "Users retrieved successfully",
    )))
}

/// Retrieves a user by its ID.
#[axum::debug_handler]
pub async fn get_user_by_id(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    tracing::info!("Getting user by ID: {} for user: {}", id, claims.sub);

    let user = state
        .user_service
        .get_user_required(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(
        user,
        "User retrieved successfully",
    )))
}

/// Applies a partial update to a user.
#[axum::debug_handler]
pub async fn update_user(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    payload.validate().map_err(validation_error_response)?;

    let user = state
        .user_service
        .update_user(&id, payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(user, "User updated successfully")))
}

/// Deletes a user.
#[axum::debug_handler]
pub async fn delete_user(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    tracing::info!("Deleting user {} by {}", id, claims.sub);

    state
        .user_service
        .delete_user(&id)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success((), "User deleted successfully")))
}
