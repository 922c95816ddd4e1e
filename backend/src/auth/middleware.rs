//! Middleware for protecting authenticated routes.
//!
//! The guard only checks the access token. It never refreshes an expired
//! token on the caller's behalf; clients do that explicitly via `/auth/refresh`.

use crate::api::AppState;
use crate::api::common::{ApiError, service_error_to_http};
use crate::errors::{ServiceError, ServiceResult};
use crate::utils::jwt::{Claims, JwtUtils};
use axum::{
    extract::{Extension, Request},
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(header: Option<&HeaderValue>) -> ServiceResult<&str> {
    let header = header.ok_or(ServiceError::MissingCredential)?;
    let value = header
        .to_str()
        .map_err(|_| ServiceError::MalformedCredential)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(ServiceError::MalformedCredential)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(ServiceError::MalformedCredential);
    }

    Ok(token)
}

/// Verifies the bearer credential in `headers` and returns its claims.
pub fn authorize(jwt_utils: &JwtUtils, headers: &HeaderMap) -> ServiceResult<Claims> {
    let token = bearer_token(headers.get(AUTHORIZATION))?;
    jwt_utils.verify_access_token(token)
}

/// JWT authentication middleware
pub async fn jwt_auth(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authorize(&state.jwt_utils, request.headers()) {
        Ok(claims) => {
            // Add claims to request extensions for use in handlers
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(error) => {
            tracing::debug!("Rejected request: {}", error);
            Err(service_error_to_http(error))
        }
    }
}
