use crate::test_utils::test_utils::{
    bearer, init_test_tracing, setup_test_app, TestApp, TEST_PASSWORD,
};
use axum::http::StatusCode;
use axum_test::TestServer;
use common::{AccessToken, ApiResponse, ErrorResponse, TokenPair};
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let _guard = init_test_tracing();
    let app = setup_test_app().await;
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_signup_creates_role_and_profile() {
    let app = TestApp::new().await;
    let token = app.client("carol").await;

    let response = bearer(app.server.get("/api/v1/profiles"), &token).await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<Vec<serde_json::Value>> = response.json();
    assert_eq!(body.data.len(), 1);
    assert_eq!(body.data[0]["profile_type"], "client");

    let response = bearer(app.server.get("/api/v1/clients"), &token).await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<Vec<serde_json::Value>> = response.json();
    assert_eq!(body.data.len(), 1);
    assert_eq!(body.data[0]["username"], "carol");
}

#[tokio::test]
async fn test_staff_signup_has_no_profile() {
    let app = TestApp::new().await;
    let token = app.staff("sam").await;

    let response = bearer(app.server.get("/api/v1/profiles"), &token).await;
    let body: ApiResponse<Vec<serde_json::Value>> = response.json();
    assert!(body.data.is_empty());

    let response = bearer(app.server.get("/api/v1/staff"), &token).await;
    let body: ApiResponse<Vec<serde_json::Value>> = response.json();
    assert_eq!(body.data.len(), 1);
}

#[tokio::test]
async fn test_signup_rejects_invalid_user_type() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "email": "x@example.com",
            "username": "x",
            "password": TEST_PASSWORD,
            "first_name": "X",
            "last_name": "Y",
            "user_type": 7,
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "INVALID_USER_TYPE");
    assert!(!body.success);
}

#[tokio::test]
async fn test_signup_without_user_type_is_an_error_envelope() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "email": "m@example.com",
            "username": "m",
            "password": TEST_PASSWORD,
            "first_name": "M",
            "last_name": "N",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "INVALID_BODY");
    assert!(body.error.contains("user_type"));
    assert!(!body.success);
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email_and_username() {
    let app = TestApp::new().await;
    app.client("dana").await;

    let response = app
        .server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "email": "dana@example.com",
            "username": "dana2",
            "password": TEST_PASSWORD,
            "first_name": "Dana",
            "last_name": "Two",
            "user_type": 3,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Email has already been used");

    let response = app
        .server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "email": "other@example.com",
            "username": "dana",
            "password": TEST_PASSWORD,
            "first_name": "Dana",
            "last_name": "Three",
            "user_type": 3,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "USERNAME_TAKEN");
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "email": "short@example.com",
            "username": "short",
            "password": "1234",
            "first_name": "S",
            "last_name": "P",
            "user_type": 2,
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new().await;
    let token = app.photographer("pete").await;

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "pete@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "pete@example.com", "password": "wrong-password" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "pete@example.com", "password": TEST_PASSWORD }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<TokenPair> = response.json();
    assert_eq!(body.message, "Login Successful");

    let user_id = app.user_id(&token).await;
    let response = bearer(
        app.server.get(&format!("/api/v1/users/photographer/{}", user_id)),
        &token,
    )
    .await;
    let body: ApiResponse<serde_json::Value> = response.json();
    assert!(!body.data["last_login"].is_null());
}

#[tokio::test]
async fn test_logout_blacklists_refresh_token() {
    let app = TestApp::new().await;
    let tokens = app.signup("lou", 3).await;

    let response = app
        .server
        .post("/api/v1/auth/token/refresh")
        .json(&json!({ "refresh_token": tokens.refresh_token }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<AccessToken> = response.json();
    assert!(!body.data.access_token.is_empty());

    let response = app
        .server
        .post("/api/v1/auth/logout")
        .json(&json!({ "refresh_token": tokens.refresh_token }))
        .await;
    response.assert_status(StatusCode::OK);

    let response = app
        .server
        .post("/api/v1/auth/token/refresh")
        .json(&json!({ "refresh_token": tokens.refresh_token }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/api/v1/auth/logout")
        .json(&json!({ "refresh_token": "not-a-token" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let app = TestApp::new().await;
    let tokens = app.signup("ava", 3).await;

    let response = app
        .server
        .post("/api/v1/auth/token/refresh")
        .json(&json!({ "refresh_token": tokens.access_token }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Refresh tokens do not authenticate API calls either.
    let response = bearer(app.server.get("/api/v1/users"), &tokens.refresh_token).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/v1/users").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "UNAUTHORIZED");

    let response = app
        .server
        .post("/api/v1/auth/token/verify")
        .json(&json!({ "token": "garbage" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
