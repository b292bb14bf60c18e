use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDateTime, Utc};
use common::{ApiResponse, ErrorResponse};
use model::entities::{booking, booking_history};
use model::entities::user::UserType;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::schemas::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingHistoryResponse {
    pub id: i32,
    pub client_id: i32,
    pub booking_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<booking_history::Model> for BookingHistoryResponse {
    fn from(model: booking_history::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            booking_id: model.booking_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateBookingHistoryRequest {
    pub booking_id: i32,
}

/// List booking history entries
#[utoipa::path(
    get,
    path = "/api/v1/booking-history",
    tag = "booking-history",
    responses(
        (status = 200, description = "Booking history retrieved successfully", body = ApiResponse<Vec<BookingHistoryResponse>>)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_booking_history(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<BookingHistoryResponse>>>> {
    trace!("Entering get_booking_history function");
    let mut select = booking_history::Entity::find().order_by_desc(booking_history::Column::CreatedAt);
    if caller.user_type() == UserType::Client {
        select = select.filter(booking_history::Column::ClientId.eq(caller.id()));
    }
    let entries = select.all(&state.db).await?;
    debug!("Retrieved {} booking history entries", entries.len());
    let data = entries.into_iter().map(BookingHistoryResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Booking history retrieved successfully")))
}

/// Record a booking in the caller's history
#[utoipa::path(
    post,
    path = "/api/v1/booking-history",
    tag = "booking-history",
    request_body = CreateBookingHistoryRequest,
    responses(
        (status = 201, description = "Booking history created successfully", body = ApiResponse<BookingHistoryResponse>),
        (status = 403, description = "Booking belongs to another client", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn create_booking_history(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<CreateBookingHistoryRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BookingHistoryResponse>>)> {
    trace!("Entering create_booking_history function");
    let target = booking::Entity::find_by_id(request.booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", request.booking_id))?;
    if target.client_id != caller.id() && !caller.is_staff() {
        warn!("User {} tried to record booking {} of another client", caller.id(), target.id);
        return Err(ApiError::Forbidden(
            "You can only record your own bookings".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let created = booking_history::ActiveModel {
        client_id: Set(target.client_id),
        booking_id: Set(target.id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;
    info!("Booking {} recorded in history of user {}", target.id, target.client_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            BookingHistoryResponse::from(created),
            "Booking history created successfully",
        )),
    ))
}

/// Get a booking history entry
#[utoipa::path(
    get,
    path = "/api/v1/booking-history/{id}",
    tag = "booking-history",
    params(("id" = i32, Path, description = "Booking history ID")),
    responses(
        (status = 200, description = "Booking history retrieved successfully", body = ApiResponse<BookingHistoryResponse>),
        (status = 403, description = "Entry belongs to another client", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_booking_history_entry(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<BookingHistoryResponse>>> {
    let entry = booking_history::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking history", id))?;
    if caller.user_type() == UserType::Client && entry.client_id != caller.id() {
        return Err(ApiError::Forbidden(
            "You can only view your own booking history".to_string(),
        ));
    }
    Ok(Json(ApiResponse::ok(
        BookingHistoryResponse::from(entry),
        "Booking history retrieved successfully",
    )))
}
