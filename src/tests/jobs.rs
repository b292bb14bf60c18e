use crate::handlers::jobs::{JobApplicationResponse, JobPostResponse, PHOTOGRAPHERS_ONLY};
use crate::test_utils::test_utils::{bearer, TestApp};
use axum::http::StatusCode;
use common::{ApiResponse, ErrorResponse};
use serde_json::json;

async fn post_job(app: &TestApp, client: &str) -> JobPostResponse {
    let response = bearer(app.server.post("/api/v1/job-posts"), client)
        .json(&json!({
            "title": "Product shoot",
            "description": "Thirty items on white background",
            "location": "Warehouse 4",
            "event_date": "2026-11-20",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: ApiResponse<JobPostResponse> = response.json();
    assert_eq!(body.message, "Job post created successfully");
    body.data
}

#[tokio::test]
async fn test_job_post_lifecycle() {
    let app = TestApp::new().await;
    let client = app.client("cleo").await;
    let other = app.client("cora").await;
    let post = post_job(&app, &client).await;
    let path = format!("/api/v1/job-posts/{}", post.id);

    let response = bearer(app.server.get("/api/v1/job-posts"), &client).await;
    response.assert_status_ok();
    let body: ApiResponse<Vec<JobPostResponse>> = response.json();
    assert_eq!(body.data.len(), 1);

    let response = bearer(app.server.put(&path), &other)
        .json(&json!({ "title": "Hijacked" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "You can only manage your own job posts");

    let response = bearer(app.server.put(&path), &client)
        .json(&json!({ "title": "Catalogue shoot" }))
        .await;
    response.assert_status_ok();
    let body: ApiResponse<JobPostResponse> = response.json();
    assert_eq!(body.data.title, "Catalogue shoot");
    assert_eq!(body.data.location, "Warehouse 4");

    let response = bearer(app.server.delete(&path), &client).await;
    response.assert_status_ok();
    let response = bearer(app.server.get(&path), &client).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_photographers_can_not_post_jobs() {
    let app = TestApp::new().await;
    let photographer = app.photographer("pia").await;

    let response = bearer(app.server.post("/api/v1/job-posts"), &photographer)
        .json(&json!({
            "title": "Self promo",
            "description": "n/a",
            "location": "n/a",
            "event_date": "2026-11-20",
        }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_apply_for_job_once() {
    let app = TestApp::new().await;
    let client = app.client("cleo").await;
    let photographer = app.photographer("paul").await;
    let post = post_job(&app, &client).await;
    let path = format!("/api/v1/job-posts/{}/applications", post.id);

    let response = bearer(app.server.post(&path), &photographer)
        .json(&json!({ "message": "I shoot products every week" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: ApiResponse<JobApplicationResponse> = response.json();
    assert_eq!(body.message, "Application submitted successfully");
    assert_eq!(body.data.job_post_id, post.id);

    let response = bearer(app.server.post(&path), &photographer)
        .json(&json!({ "message": "Second try" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "ALREADY_APPLIED");

    let response = bearer(app.server.post(&path), &client)
        .json(&json!({ "message": "Me too" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, PHOTOGRAPHERS_ONLY);

    // The post owner sees the application.
    let response = bearer(app.server.get(&path), &client).await;
    response.assert_status_ok();
    let body: ApiResponse<Vec<JobApplicationResponse>> = response.json();
    assert_eq!(body.data.len(), 1);

    let response = bearer(app.server.get("/api/v1/job-applications"), &photographer).await;
    let body: ApiResponse<Vec<JobApplicationResponse>> = response.json();
    assert_eq!(body.data.len(), 1);
}

#[tokio::test]
async fn test_only_applicant_manages_application() {
    let app = TestApp::new().await;
    let client = app.client("cleo").await;
    let applicant = app.photographer("paul").await;
    let rival = app.photographer("rita").await;
    let post = post_job(&app, &client).await;

    let response = bearer(
        app.server.post(&format!("/api/v1/job-posts/{}/applications", post.id)),
        &applicant,
    )
    .json(&json!({ "message": "Available" }))
    .await;
    let application = response.json::<ApiResponse<JobApplicationResponse>>().data;
    let path = format!("/api/v1/job-applications/{}", application.id);

    let response = bearer(app.server.put(&path), &rival)
        .json(&json!({ "message": "Mine now" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "You can only manage your own applications");

    let response = bearer(app.server.put(&path), &applicant)
        .json(&json!({ "message": "Available all day" }))
        .await;
    response.assert_status_ok();
    let body: ApiResponse<JobApplicationResponse> = response.json();
    assert_eq!(body.message, "Application updated successfully");
    assert_eq!(body.data.message, "Available all day");

    let response = bearer(app.server.delete(&path), &applicant).await;
    response.assert_status_ok();
    let body: ApiResponse<String> = response.json();
    assert_eq!(body.message, "Job application deleted successfully");

    let response = bearer(app.server.get(&path), &applicant).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Job application not found");
}
