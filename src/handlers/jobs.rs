use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use common::{ApiResponse, ErrorResponse};
use model::entities::user::UserType;
use model::entities::{client, job_application, job_post, photographer};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::{is_unique_violation, ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::handlers::bookings::CLIENTS_ONLY;
use crate::schemas::AppState;

pub const PHOTOGRAPHERS_ONLY: &str = "Access denied. Only photographers can access this endpoint";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobPostResponse {
    pub id: i32,
    /// Posting client's user id
    pub client_id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl From<job_post::Model> for JobPostResponse {
    fn from(model: job_post::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            title: model.title,
            description: model.description,
            location: model.location,
            event_date: model.event_date,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobApplicationResponse {
    pub id: i32,
    pub job_post_id: i32,
    /// Applicant's photographer profile id
    pub photographer_id: i32,
    /// Post owner's client profile id
    pub client_id: i32,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl From<job_application::Model> for JobApplicationResponse {
    fn from(model: job_application::Model) -> Self {
        Self {
            id: model.id,
            job_post_id: model.job_post_id,
            photographer_id: model.photographer_id,
            client_id: model.client_id,
            message: model.message,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateJobPostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    pub event_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateJobPostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    pub event_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct JobApplicationRequest {
    #[validate(length(min = 1))]
    pub message: String,
}

async fn find_post(state: &AppState, id: i32) -> ApiResult<job_post::Model> {
    job_post::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Job post", id))
}

fn require_post_owner(caller: &AuthUser, post: &job_post::Model) -> ApiResult<()> {
    if post.client_id == caller.id() {
        Ok(())
    } else {
        warn!("Client {} is not the owner of job post {}", caller.id(), post.id);
        Err(ApiError::Forbidden(
            "You can only manage your own job posts".to_string(),
        ))
    }
}

async fn caller_photographer_row(state: &AppState, caller: &AuthUser) -> ApiResult<photographer::Model> {
    caller.require(UserType::Photographer, PHOTOGRAPHERS_ONLY)?;
    photographer::Entity::find()
        .filter(photographer::Column::UserId.eq(caller.id()))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Photographer profile not found".to_string()))
}

/// List job posts
#[utoipa::path(
    get,
    path = "/api/v1/job-posts",
    tag = "jobs",
    responses(
        (status = 200, description = "Job posts retrieved successfully", body = ApiResponse<Vec<JobPostResponse>>)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_job_posts(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<JobPostResponse>>>> {
    trace!("Entering get_job_posts function");
    let posts = job_post::Entity::find()
        .order_by_desc(job_post::Column::CreatedAt)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} job posts", posts.len());
    let data = posts.into_iter().map(JobPostResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Job posts retrieved successfully")))
}

/// Advertise a job
#[utoipa::path(
    post,
    path = "/api/v1/job-posts",
    tag = "jobs",
    request_body = CreateJobPostRequest,
    responses(
        (status = 201, description = "Job post created successfully", body = ApiResponse<JobPostResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is not a client", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn create_job_post(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<CreateJobPostRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JobPostResponse>>)> {
    trace!("Entering create_job_post function");
    caller.require(UserType::Client, CLIENTS_ONLY)?;
    request.validate()?;

    let client_row = client::Entity::find()
        .filter(client::Column::UserId.eq(caller.id()))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client profile not found".to_string()))?;

    let created = job_post::ActiveModel {
        client_id: Set(caller.id()),
        client_profile_id: Set(client_row.id),
        title: Set(request.title),
        description: Set(request.description),
        location: Set(request.location),
        event_date: Set(request.event_date),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;
    info!("Job post {} created by client {}", created.id, caller.id());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            JobPostResponse::from(created),
            "Job post created successfully",
        )),
    ))
}

/// Get a job post
#[utoipa::path(
    get,
    path = "/api/v1/job-posts/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Job post retrieved successfully", body = ApiResponse<JobPostResponse>),
        (status = 403, description = "Caller is not a client", body = ErrorResponse),
        (status = 404, description = "Job post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_job_post(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<JobPostResponse>>> {
    caller.require(UserType::Client, CLIENTS_ONLY)?;
    let post = find_post(&state, id).await?;
    Ok(Json(ApiResponse::ok(
        JobPostResponse::from(post),
        "Job post retrieved successfully",
    )))
}

/// Edit one of the caller's job posts
#[utoipa::path(
    put,
    path = "/api/v1/job-posts/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job post ID")),
    request_body = UpdateJobPostRequest,
    responses(
        (status = 200, description = "Job post updated successfully", body = ApiResponse<JobPostResponse>),
        (status = 403, description = "Not a client or not your post", body = ErrorResponse),
        (status = 404, description = "Job post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn update_job_post(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<UpdateJobPostRequest>,
) -> ApiResult<Json<ApiResponse<JobPostResponse>>> {
    caller.require(UserType::Client, CLIENTS_ONLY)?;
    let post = find_post(&state, id).await?;
    require_post_owner(&caller, &post)?;
    request.validate()?;

    let mut active: job_post::ActiveModel = post.into();
    if let Some(title) = request.title {
        active.title = Set(title);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }
    if let Some(location) = request.location {
        active.location = Set(location);
    }
    if let Some(date) = request.event_date {
        active.event_date = Set(date);
    }
    let updated = active.update(&state.db).await?;
    info!("Job post {} updated", id);
    Ok(Json(ApiResponse::ok(
        JobPostResponse::from(updated),
        "Job post updated successfully",
    )))
}

/// Remove one of the caller's job posts
#[utoipa::path(
    delete,
    path = "/api/v1/job-posts/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Job post deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Not a client or not your post", body = ErrorResponse),
        (status = 404, description = "Job post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn delete_job_post(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    caller.require(UserType::Client, CLIENTS_ONLY)?;
    let post = find_post(&state, id).await?;
    require_post_owner(&caller, &post)?;
    job_post::Entity::delete_by_id(id).exec(&state.db).await?;
    info!("Job post {} deleted", id);
    Ok(Json(ApiResponse::ok(
        format!("Job post {} deleted", id),
        "Job post deleted successfully",
    )))
}

/// Apply to a job post
#[utoipa::path(
    post,
    path = "/api/v1/job-posts/{id}/applications",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job post ID")),
    request_body = JobApplicationRequest,
    responses(
        (status = 201, description = "Application submitted successfully", body = ApiResponse<JobApplicationResponse>),
        (status = 403, description = "Caller is not a photographer", body = ErrorResponse),
        (status = 404, description = "Job post not found", body = ErrorResponse),
        (status = 409, description = "Already applied", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn apply_for_job(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<JobApplicationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JobApplicationResponse>>)> {
    trace!("Entering apply_for_job function for post {}", id);
    let applicant = caller_photographer_row(&state, &caller).await?;
    request.validate()?;
    let post = find_post(&state, id).await?;

    let already = || ApiError::conflict("ALREADY_APPLIED", "You have already applied to this job");
    let existing = job_application::Entity::find()
        .filter(job_application::Column::JobPostId.eq(post.id))
        .filter(job_application::Column::PhotographerId.eq(applicant.id))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(already());
    }

    let created = job_application::ActiveModel {
        job_post_id: Set(post.id),
        photographer_id: Set(applicant.id),
        client_id: Set(post.client_profile_id),
        message: Set(request.message),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| if is_unique_violation(&e) { already() } else { ApiError::Database(e) })?;
    info!("Photographer {} applied to job post {}", applicant.id, post.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            JobApplicationResponse::from(created),
            "Application submitted successfully",
        )),
    ))
}

/// List applications to one of the caller's job posts
#[utoipa::path(
    get,
    path = "/api/v1/job-posts/{id}/applications",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<JobApplicationResponse>>),
        (status = 403, description = "Not your post", body = ErrorResponse),
        (status = 404, description = "Job post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_job_post_applications(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<JobApplicationResponse>>>> {
    caller.require(UserType::Client, CLIENTS_ONLY)?;
    let post = find_post(&state, id).await?;
    require_post_owner(&caller, &post)?;

    let applications = job_application::Entity::find()
        .filter(job_application::Column::JobPostId.eq(post.id))
        .order_by_asc(job_application::Column::CreatedAt)
        .all(&state.db)
        .await?;
    debug!("Job post {} has {} applications", id, applications.len());
    let data = applications
        .into_iter()
        .map(JobApplicationResponse::from)
        .collect();
    Ok(Json(ApiResponse::ok(data, "Applications retrieved successfully")))
}

/// List the caller's job applications
#[utoipa::path(
    get,
    path = "/api/v1/job-applications",
    tag = "jobs",
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<JobApplicationResponse>>),
        (status = 403, description = "Caller is not a photographer", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_job_applications(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<JobApplicationResponse>>>> {
    let applicant = caller_photographer_row(&state, &caller).await?;
    let data = job_application::Entity::find()
        .filter(job_application::Column::PhotographerId.eq(applicant.id))
        .order_by_desc(job_application::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(JobApplicationResponse::from)
        .collect();
    Ok(Json(ApiResponse::ok(data, "Applications retrieved successfully")))
}

async fn find_application(state: &AppState, id: i32) -> ApiResult<job_application::Model> {
    job_application::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job application not found".to_string()))
}

fn require_applicant(applicant: &photographer::Model, application: &job_application::Model) -> ApiResult<()> {
    if application.photographer_id == applicant.id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You can only manage your own applications".to_string(),
        ))
    }
}

/// Get a job application
#[utoipa::path(
    get,
    path = "/api/v1/job-applications/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job application ID")),
    responses(
        (status = 200, description = "Application retrieved successfully", body = ApiResponse<JobApplicationResponse>),
        (status = 403, description = "Caller is not a photographer", body = ErrorResponse),
        (status = 404, description = "Job application not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_job_application(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<JobApplicationResponse>>> {
    caller.require(UserType::Photographer, PHOTOGRAPHERS_ONLY)?;
    let application = find_application(&state, id).await?;
    Ok(Json(ApiResponse::ok(
        JobApplicationResponse::from(application),
        "Application retrieved successfully",
    )))
}

/// Edit the message of the caller's application
#[utoipa::path(
    put,
    path = "/api/v1/job-applications/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job application ID")),
    request_body = JobApplicationRequest,
    responses(
        (status = 200, description = "Application updated successfully", body = ApiResponse<JobApplicationResponse>),
        (status = 403, description = "Not a photographer or not your application", body = ErrorResponse),
        (status = 404, description = "Job application not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn update_job_application(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<JobApplicationRequest>,
) -> ApiResult<Json<ApiResponse<JobApplicationResponse>>> {
    let applicant = caller_photographer_row(&state, &caller).await?;
    let application = find_application(&state, id).await?;
    require_applicant(&applicant, &application)?;
    request.validate()?;

    let mut active: job_application::ActiveModel = application.into();
    active.message = Set(request.message);
    let updated = active.update(&state.db).await?;
    info!("Job application {} updated", id);
    Ok(Json(ApiResponse::ok(
        JobApplicationResponse::from(updated),
        "Application updated successfully",
    )))
}

/// Withdraw the caller's application
#[utoipa::path(
    delete,
    path = "/api/v1/job-applications/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job application ID")),
    responses(
        (status = 200, description = "Job application deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Not a photographer or not your application", body = ErrorResponse),
        (status = 404, description = "Job application not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn delete_job_application(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let applicant = caller_photographer_row(&state, &caller).await?;
    let application = find_application(&state, id).await?;
    require_applicant(&applicant, &application)?;

    job_application::Entity::delete_by_id(id).exec(&state.db).await?;
    info!("Job application {} withdrawn", id);
    Ok(Json(ApiResponse::ok(
        format!("Job application {} deleted", id),
        "Job application deleted successfully",
    )))
}
