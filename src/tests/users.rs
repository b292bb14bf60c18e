use crate::handlers::users::{PhotographerResponse, StaffResponse, UserResponse};
use crate::test_utils::test_utils::{bearer, TestApp};
use axum::http::StatusCode;
use common::{ApiResponse, ErrorResponse};
use serde_json::json;

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::new().await;
    let staff = app.staff("ursula").await;
    app.photographer("uma").await;
    app.client("uri").await;

    let response = bearer(app.server.get("/api/v1/users"), &staff).await;
    response.assert_status_ok();
    let body: ApiResponse<Vec<UserResponse>> = response.json();
    assert_eq!(body.message, "Users retrieved successfully");
    let types: Vec<i32> = body.data.iter().map(|u| u.user_type).collect();
    assert_eq!(types, vec![1, 2, 3]);

    let response = bearer(app.server.get("/api/v1/staff"), &staff).await;
    let body: ApiResponse<Vec<StaffResponse>> = response.json();
    assert_eq!(body.data[0].username, "ursula");
}

#[tokio::test]
async fn test_typed_user_route_checks_role() {
    let app = TestApp::new().await;
    let client = app.client("uri").await;
    let client_id = app.user_id(&client).await;

    let response = bearer(
        app.server.get(&format!("/api/v1/users/client/{}", client_id)),
        &client,
    )
    .await;
    response.assert_status_ok();
    let body: ApiResponse<UserResponse> = response.json();
    assert_eq!(body.message, "User retrieved successfully");
    assert_eq!(body.data.email, "uri@example.com");

    let response = bearer(
        app.server.get(&format!("/api/v1/users/photographer/{}", client_id)),
        &client,
    )
    .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_user_self_or_staff() {
    let app = TestApp::new().await;
    let client = app.client("uri").await;
    let other = app.client("ulf").await;
    let staff = app.staff("ursula").await;
    let client_id = app.user_id(&client).await;
    let path = format!("/api/v1/users/client/{}", client_id);

    let response = bearer(app.server.put(&path), &other)
        .json(&json!({ "first_name": "Mallory" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = bearer(app.server.put(&path), &client)
        .json(&json!({ "first_name": "Uriel" }))
        .await;
    response.assert_status_ok();
    let body: ApiResponse<UserResponse> = response.json();
    assert_eq!(body.message, "User updated successfully");
    assert_eq!(body.data.first_name, "Uriel");

    let response = bearer(app.server.put(&path), &staff)
        .json(&json!({ "username": "ulf" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Username has already been used");
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new().await;
    let staff = app.staff("ursula").await;
    let photographer = app.photographer("uma").await;
    let photographer_id = app.user_id(&photographer).await;
    let path = format!("/api/v1/users/photographer/{}", photographer_id);

    let response = bearer(app.server.delete(&path), &staff).await;
    response.assert_status_ok();
    let body: ApiResponse<String> = response.json();
    assert_eq!(body.message, "User deleted successfully");

    let response = bearer(app.server.get(&path), &staff).await;
    response.assert_status(StatusCode::NOT_FOUND);

    // The deleted account can no longer authenticate.
    let response = bearer(app.server.get("/api/v1/users"), &photographer).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_photographer_details() {
    let app = TestApp::new().await;
    let photographer = app.photographer("uma").await;
    let rival = app.photographer("una").await;
    let photographer_id = app.user_id(&photographer).await;

    let response = bearer(app.server.get("/api/v1/photographers"), &photographer).await;
    let row = response
        .json::<ApiResponse<Vec<PhotographerResponse>>>()
        .data
        .into_iter()
        .find(|p| p.user_id as i64 == photographer_id)
        .unwrap();
    let path = format!("/api/v1/photographers/{}", row.id);

    let response = bearer(app.server.put(&path), &rival)
        .json(&json!({ "bio": "Not mine" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = bearer(app.server.put(&path), &photographer)
        .json(&json!({ "bio": "Street and documentary", "age": 31 }))
        .await;
    response.assert_status_ok();
    let body: ApiResponse<PhotographerResponse> = response.json();
    assert_eq!(body.data.bio, "Street and documentary");
    assert_eq!(body.data.age, Some(31));
    assert_eq!(body.data.username, "uma");
}
