use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use common::{ApiResponse, ErrorResponse};
use model::entities::user::UserType;
use model::entities::work_history;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::schemas::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkHistoryResponse {
    pub id: i32,
    /// Photographer user id
    pub photographer_id: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub position: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<work_history::Model> for WorkHistoryResponse {
    fn from(model: work_history::Model) -> Self {
        Self {
            id: model.id,
            photographer_id: model.photographer_id,
            start_date: model.start_date,
            end_date: model.end_date,
            position: model.position,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateWorkHistoryRequest {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100))]
    pub position: String,
    #[serde(default)]
    pub description: String,
}

/// List work history entries
#[utoipa::path(
    get,
    path = "/api/v1/work-history",
    tag = "work-history",
    responses(
        (status = 200, description = "Work history retrieved successfully", body = ApiResponse<Vec<WorkHistoryResponse>>)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_work_history(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<WorkHistoryResponse>>>> {
    trace!("Entering get_work_history function");
    let entries = work_history::Entity::find()
        .order_by_desc(work_history::Column::StartDate)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} work history entries", entries.len());
    let data = entries.into_iter().map(WorkHistoryResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Work history retrieved successfully")))
}

/// Add an entry to the caller's work history
#[utoipa::path(
    post,
    path = "/api/v1/work-history",
    tag = "work-history",
    request_body = CreateWorkHistoryRequest,
    responses(
        (status = 201, description = "Work history created successfully", body = ApiResponse<WorkHistoryResponse>),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 403, description = "Caller is not a photographer", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn create_work_history(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<CreateWorkHistoryRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<WorkHistoryResponse>>)> {
    trace!("Entering create_work_history function");
    caller.require(
        UserType::Photographer,
        "Only photographers can add work history",
    )?;
    request.validate()?;

    if !work_history::is_valid_range(request.start_date, request.end_date) {
        return Err(ApiError::bad_request(
            "INVALID_DATE_RANGE",
            "End date can not be before start date",
        ));
    }

    let now = Utc::now().naive_utc();
    let created = work_history::ActiveModel {
        photographer_id: Set(caller.id()),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        position: Set(request.position),
        description: Set(request.description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;
    info!("Work history {} added for photographer {}", created.id, caller.id());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            WorkHistoryResponse::from(created),
            "Work history created successfully",
        )),
    ))
}

/// Get a work history entry
#[utoipa::path(
    get,
    path = "/api/v1/work-history/{id}",
    tag = "work-history",
    params(("id" = i32, Path, description = "Work history ID")),
    responses(
        (status = 200, description = "Work history retrieved successfully", body = ApiResponse<WorkHistoryResponse>),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_work_history_entry(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<ApiResponse<WorkHistoryResponse>>> {
    let entry = work_history::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Work history", id))?;
    Ok(Json(ApiResponse::ok(
        WorkHistoryResponse::from(entry),
        "Work history retrieved successfully",
    )))
}
