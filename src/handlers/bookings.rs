use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use common::{ApiResponse, ErrorResponse, PageQuery};
use model::entities::booking::{self, BookingStatus};
use model::entities::{client, notification, photographer, user};
use model::entities::user::UserType;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ValidQuery};
use crate::schemas::AppState;

pub const CLIENTS_ONLY: &str = "Only clients can perform this action";
pub const BOOKING_NOTIFICATION_SUBJECT: &str = "New Booking Notification";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: i32,
    /// Client user id
    pub client_id: i32,
    /// Photographer user id
    pub photographer_id: i32,
    pub event_date: NaiveDate,
    pub location: String,
    pub description: String,
    pub is_confirmed: bool,
    /// Pending, Accepted or Denied
    pub status: String,
    pub reason_for_denial: Option<String>,
    pub created_at: NaiveDateTime,
    pub responded_at: Option<NaiveDateTime>,
}

impl From<booking::Model> for BookingResponse {
    fn from(model: booking::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            photographer_id: model.photographer_id,
            event_date: model.event_date,
            location: model.location,
            description: model.description,
            is_confirmed: model.is_confirmed,
            status: model.status.as_str().to_string(),
            reason_for_denial: model.reason_for_denial,
            created_at: model.created_at,
            responded_at: model.responded_at,
        }
    }
}

/// Query parameters for listing bookings
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
pub struct BookingListQuery {
    /// Page number, starting at 1 (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<u64>,
    /// Only bookings in this status (Pending, Accepted, Denied)
    pub status: Option<String>,
}

impl BookingListQuery {
    fn paging(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateBookingRequest {
    /// The photographer's user id
    pub photographer_id: i32,
    pub event_date: NaiveDate,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[validate(length(min = 1))]
    pub description: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateBookingRequest {
    pub event_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReviewBookingRequest {
    /// Accepted or Denied
    pub status: String,
    pub reason_for_denial: Option<String>,
}

/// Loads a booking the calling client owns.
async fn find_own_booking(state: &AppState, caller: &AuthUser, booking_id: i32) -> ApiResult<booking::Model> {
    caller.require(UserType::Client, CLIENTS_ONLY)?;
    let found = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", booking_id))?;
    if found.client_id != caller.id() {
        warn!("Client {} tried to access booking {}", caller.id(), booking_id);
        return Err(ApiError::Forbidden(
            "You can only manage your own bookings".to_string(),
        ));
    }
    Ok(found)
}

/// List bookings visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "bookings",
    params(BookingListQuery),
    responses(
        (status = 200, description = "Bookings retrieved successfully", body = ApiResponse<Vec<BookingResponse>>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_bookings(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidQuery(query): ValidQuery<BookingListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<BookingResponse>>>> {
    trace!("Entering get_bookings function");
    let mut select = booking::Entity::find().order_by_desc(booking::Column::CreatedAt);

    match caller.user_type() {
        UserType::Client => select = select.filter(booking::Column::ClientId.eq(caller.id())),
        UserType::Photographer => {
            select = select.filter(booking::Column::PhotographerId.eq(caller.id()))
        }
        UserType::Staff => {}
    }

    if let Some(status) = query.status.as_deref() {
        let status = BookingStatus::parse(status).ok_or_else(|| {
            ApiError::bad_request("INVALID_STATUS", format!("Unknown booking status '{}'", status))
        })?;
        select = select.filter(booking::Column::Status.eq(status));
    }

    let paging = query.paging();
    let bookings = select
        .paginate(&state.db, paging.page_size())
        .fetch_page(paging.page_index())
        .await?;
    debug!("Retrieved {} bookings", bookings.len());

    let data = bookings.into_iter().map(BookingResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Bookings retrieved successfully")))
}

/// Request a photographer
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created successfully", body = ApiResponse<BookingResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is not a client", body = ErrorResponse),
        (status = 404, description = "Photographer not found", body = ErrorResponse),
        (status = 409, description = "Photographer is suspended", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn create_booking(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BookingResponse>>)> {
    trace!("Entering create_booking function");
    caller.require(UserType::Client, CLIENTS_ONLY)?;
    request.validate()?;

    let photographer_user = user::Entity::find_by_id(request.photographer_id)
        .one(&state.db)
        .await?
        .filter(|u| u.user_type == UserType::Photographer)
        .ok_or_else(|| ApiError::not_found("Photographer", request.photographer_id))?;
    let shooter = photographer::Entity::find()
        .filter(photographer::Column::UserId.eq(photographer_user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Photographer", request.photographer_id))?;
    if shooter.is_suspended {
        warn!("Booking refused: photographer {} is suspended", photographer_user.id);
        return Err(ApiError::conflict(
            "PHOTOGRAPHER_SUSPENDED",
            "This photographer is suspended and can not take bookings",
        ));
    }

    let client_row = client::Entity::find()
        .filter(client::Column::UserId.eq(caller.id()))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client profile not found".to_string()))?;

    let now = Utc::now().naive_utc();
    let txn = state.db.begin().await?;
    let created = booking::ActiveModel {
        client_id: Set(caller.id()),
        photographer_id: Set(photographer_user.id),
        client_profile_id: Set(client_row.id),
        photographer_profile_id: Set(shooter.id),
        event_date: Set(request.event_date),
        location: Set(request.location),
        description: Set(request.description),
        is_confirmed: Set(false),
        status: Set(BookingStatus::Pending),
        reason_for_denial: Set(None),
        created_at: Set(now),
        responded_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    notification::ActiveModel {
        photographer_id: Set(shooter.id),
        booking_id: Set(created.id),
        is_read: Set(false),
        created_at: Set(now),
        unanswered_count: Set(0),
        last_checked_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(
        "Booking {} created by client {} for photographer {}",
        created.id,
        caller.id(),
        photographer_user.id
    );

    if let Err(e) = state
        .mailer
        .send(
            &photographer_user.email,
            BOOKING_NOTIFICATION_SUBJECT,
            "You have a new booking request. Please log in to your account to review and respond.",
        )
        .await
    {
        warn!("Booking {} notification email failed: {}", created.id, e);
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            BookingResponse::from(created),
            "Booking created successfully",
        )),
    ))
}

/// Get one of the caller's bookings
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking retrieved successfully", body = ApiResponse<BookingResponse>),
        (status = 403, description = "Not a client or not your booking", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_booking(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<BookingResponse>>> {
    let found = find_own_booking(&state, &caller, id).await?;
    Ok(Json(ApiResponse::ok(
        BookingResponse::from(found),
        "Booking retrieved successfully",
    )))
}

/// Edit a pending booking
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}",
    tag = "bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated successfully", body = ApiResponse<BookingResponse>),
        (status = 403, description = "Not a client or not your booking", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking already answered", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn update_booking(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<UpdateBookingRequest>,
) -> ApiResult<Json<ApiResponse<BookingResponse>>> {
    trace!("Entering update_booking function for id: {}", id);
    let found = find_own_booking(&state, &caller, id).await?;
    request.validate()?;
    if found.status.is_terminal() {
        return Err(ApiError::conflict(
            "BOOKING_NOT_PENDING",
            format!("Booking is already {}", found.status.as_str()),
        ));
    }

    let mut active: booking::ActiveModel = found.into();
    if let Some(date) = request.event_date {
        active.event_date = Set(date);
    }
    if let Some(location) = request.location {
        active.location = Set(location);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }
    let updated = active.update(&state.db).await?;
    info!("Booking {} updated by client {}", id, caller.id());
    Ok(Json(ApiResponse::ok(
        BookingResponse::from(updated),
        "Booking updated successfully",
    )))
}

/// Cancel one of the caller's bookings
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    tag = "bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Not a client or not your booking", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn delete_booking(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let found = find_own_booking(&state, &caller, id).await?;
    booking::Entity::delete_by_id(found.id).exec(&state.db).await?;
    info!("Booking {} deleted by client {}", id, caller.id());
    Ok(Json(ApiResponse::ok(
        format!("Booking {} deleted", id),
        "Booking deleted successfully",
    )))
}

/// Accept or deny a booking
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/review",
    tag = "bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = ReviewBookingRequest,
    responses(
        (status = 200, description = "Booking reviewed", body = ApiResponse<BookingResponse>),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 403, description = "Not the booked photographer", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking already answered or review period over", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn review_booking(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<ReviewBookingRequest>,
) -> ApiResult<Json<ApiResponse<BookingResponse>>> {
    trace!("Entering review_booking function for id: {}", id);
    caller.require(
        UserType::Photographer,
        "Only photographers can review bookings",
    )?;

    let found = booking::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", id))?;
    if found.photographer_id != caller.id() {
        return Err(ApiError::Forbidden(
            "Only the booked photographer can review this booking".to_string(),
        ));
    }

    let next = BookingStatus::parse(&request.status)
        .filter(|s| *s != BookingStatus::Pending)
        .ok_or_else(|| {
            ApiError::bad_request("INVALID_STATUS", "Status must be Accepted or Denied")
        })?;
    if !found.status.can_transition_to(next) {
        return Err(ApiError::conflict(
            "BOOKING_NOT_PENDING",
            format!("Booking is already {}", found.status.as_str()),
        ));
    }

    let now = Utc::now().naive_utc();
    if state.policy.booking_expired(&found, now) {
        return Err(ApiError::conflict(
            "REVIEW_PERIOD_EXPIRED",
            state.policy.decline_reason(),
        ));
    }

    let reason = match next {
        BookingStatus::Denied => request.reason_for_denial.clone(),
        _ => None,
    };

    let txn = state.db.begin().await?;
    // Guarded on Pending so the timer and the photographer can not both answer.
    let result = booking::Entity::update_many()
        .col_expr(booking::Column::Status, Expr::value(next))
        .col_expr(
            booking::Column::IsConfirmed,
            Expr::value(next == BookingStatus::Accepted),
        )
        .col_expr(booking::Column::ReasonForDenial, Expr::value(reason))
        .col_expr(booking::Column::RespondedAt, Expr::value(Some(now)))
        .filter(booking::Column::Id.eq(id))
        .filter(booking::Column::Status.eq(BookingStatus::Pending))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(ApiError::conflict(
            "BOOKING_NOT_PENDING",
            "Booking was answered in the meantime",
        ));
    }

    let read = notification::Entity::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::BookingId.eq(id))
        .exec(&txn)
        .await?;
    txn.commit().await?;
    debug!("Marked {} notifications read", read.rows_affected);

    let updated = booking::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", id))?;
    info!("Booking {} {} by photographer {}", id, next.as_str(), caller.id());
    Ok(Json(ApiResponse::ok(
        BookingResponse::from(updated),
        format!("Booking {}", next.as_str().to_lowercase()),
    )))
}
