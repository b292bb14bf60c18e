use axum::{
    extract::State,
    response::Json,
};
use chrono::NaiveDateTime;
use common::{ApiResponse, ErrorResponse};
use model::entities::user::UserType;
use model::entities::{notification, photographer};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::errors::{ApiError, ApiResult};
use crate::extract::ApiPath;
use crate::schemas::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    /// Photographer profile id
    pub photographer_id: i32,
    pub booking_id: i32,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
    /// Response windows that passed without the notification being read
    pub unanswered_count: i32,
    pub last_checked_at: Option<NaiveDateTime>,
}

impl From<notification::Model> for NotificationResponse {
    fn from(model: notification::Model) -> Self {
        Self {
            id: model.id,
            photographer_id: model.photographer_id,
            booking_id: model.booking_id,
            is_read: model.is_read,
            created_at: model.created_at,
            unanswered_count: model.unanswered_count,
            last_checked_at: model.last_checked_at,
        }
    }
}

async fn caller_photographer_id(state: &AppState, caller: &AuthUser) -> ApiResult<i32> {
    photographer::Entity::find()
        .filter(photographer::Column::UserId.eq(caller.id()))
        .one(&state.db)
        .await?
        .map(|row| row.id)
        .ok_or_else(|| ApiError::NotFound("Photographer profile not found".to_string()))
}

/// List notifications
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "Notifications retrieved successfully", body = ApiResponse<Vec<NotificationResponse>>),
        (status = 403, description = "Clients have no notifications", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_notifications(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<NotificationResponse>>>> {
    trace!("Entering get_notifications function");
    let mut select = notification::Entity::find().order_by_desc(notification::Column::CreatedAt);
    match caller.user_type() {
        UserType::Staff => {}
        UserType::Photographer => {
            let photographer_id = caller_photographer_id(&state, &caller).await?;
            select = select.filter(notification::Column::PhotographerId.eq(photographer_id));
        }
        UserType::Client => {
            return Err(ApiError::Forbidden(
                "You do not have permission to view notifications".to_string(),
            ));
        }
    }

    let notifications = select.all(&state.db).await?;
    debug!("Retrieved {} notifications", notifications.len());
    let data = notifications
        .into_iter()
        .map(NotificationResponse::from)
        .collect();
    Ok(Json(ApiResponse::ok(data, "Notifications retrieved successfully")))
}

/// Mark a notification read
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    tag = "notifications",
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked as read", body = ApiResponse<NotificationResponse>),
        (status = 403, description = "Not your notification", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn mark_notification_read(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<NotificationResponse>>> {
    caller.require(
        UserType::Photographer,
        "Only photographers can mark notifications read",
    )?;
    let photographer_id = caller_photographer_id(&state, &caller).await?;

    let found = notification::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification", id))?;
    if found.photographer_id != photographer_id {
        return Err(ApiError::Forbidden(
            "This notification belongs to another photographer".to_string(),
        ));
    }

    let mut active: notification::ActiveModel = found.into();
    active.is_read = Set(true);
    let updated = active.update(&state.db).await?;
    info!("Notification {} marked read", id);
    Ok(Json(ApiResponse::ok(
        NotificationResponse::from(updated),
        "Notification marked as read",
    )))
}
