use apiprofile_backend::api::{AppState, app_router};
use apiprofile_backend::config::AuthConfig;
use apiprofile_backend::database::Database;
use apiprofile_backend::repositories::{RefreshTokenRepository, UserRepository};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = Database::in_memory().await.unwrap();
    let state = AppState::new(
        Arc::new(UserRepository::new(db.pool().clone())),
        Arc::new(RefreshTokenRepository::new(db.pool().clone())),
        AuthConfig {
            jwt_secret: "integration-secret".to_string(),
            access_token_ttl: Duration::seconds(900),
            refresh_token_ttl: Duration::seconds(86400),
            bcrypt_cost: 4,
        },
    );
    app_router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register_and_login(app: &Router) -> Value {
    let (status, _) = send(
        app,
        "POST",
        "/auth/register",
        Some(json!({"name": "Ann", "email": "ann@x.com", "password": "secret123"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        Some(json!({"email": "ann@x.com", "password": "secret123"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"].clone()
}

#[tokio::test]
async fn test_register_login_refresh_logout() {
    let app = test_app().await;
    let login = register_and_login(&app).await;
    assert_eq!(login["user"]["role"], "user");
    assert!(login["user"].get("password_hash").is_none());

    let access = login["access_token"].as_str().unwrap().to_string();
    let refresh = login["refresh_token"].as_str().unwrap().to_string();

    let (status, me) = send(&app, "GET", "/auth/me", None, Some(&access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["email"], "ann@x.com");

    let (status, refreshed) = send(
        &app,
        "POST",
        "/auth/refresh",
        Some(json!({"refresh_token": refresh})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let next_refresh = refreshed["data"]["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(next_refresh, refresh);

    let (status, replay) = send(
        &app,
        "POST",
        "/auth/refresh",
        Some(json!({"refresh_token": refresh})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay["error"]["error_type"], "invalid_refresh_token");

    let (status, _) = send(
        &app,
        "POST",
        "/auth/logout",
        Some(json!({"refresh_token": next_refresh})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/refresh",
        Some(json!({"refresh_token": next_refresh})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = test_app().await;
    register_and_login(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        Some(json!({"name": "Ann", "email": "ann@x.com", "password": "secret123"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["error_type"], "duplicate_email");
}

#[tokio::test]
async fn test_bad_credentials_look_the_same() {
    let app = test_app().await;
    register_and_login(&app).await;

    let (unknown_status, unknown) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({"email": "noone@x.com", "password": "anything"})),
        None,
    )
    .await;
    let (wrong_status, wrong) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({"email": "ann@x.com", "password": "wrongpass"})),
        None,
    )
    .await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["message"], wrong["message"]);
    assert_eq!(unknown["error"], wrong["error"]);
}

#[tokio::test]
async fn test_invalid_payload_is_validation_error() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        Some(json!({"name": "", "email": "nope", "password": "1"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["error_type"], "validation_error");
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_user_routes_require_bearer_token() {
    let app = test_app().await;
    let login = register_and_login(&app).await;
    let access = login["access_token"].as_str().unwrap();

    let (status, body) = send(&app, "GET", "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["error_type"], "missing_credential");

    let (status, body) = send(&app, "GET", "/users", None, Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["error_type"], "invalid_token");

    let (status, body) = send(&app, "GET", "/users", None, Some(access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_crud_behind_guard() {
    let app = test_app().await;
    let login = register_and_login(&app).await;
    let access = login["access_token"].as_str().unwrap();

    let (status, created) = send(
        &app,
        "POST",
        "/users",
        Some(json!({
            "name": "Bob",
            "email": "bob@x.com",
            "password": "hunter22",
            "role": "admin"
        })),
        Some(access),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bob_id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["role"], "admin");

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/users/{bob_id}"),
        Some(json!({"name": "Robert"})),
        Some(access),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Robert");
    assert_eq!(updated["data"]["email"], "bob@x.com");

    let (status, fetched) = send(&app, "GET", &format!("/users/{bob_id}"), None, Some(access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["name"], "Robert");

    let (status, _) = send(&app, "DELETE", &format!("/users/{bob_id}"), None, Some(access)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/users/{bob_id}"), None, Some(access)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["error_type"], "not_found");
}
