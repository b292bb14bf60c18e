use axum::{
    extract::State,
    response::Json,
};
use chrono::NaiveDateTime;
use common::{ApiResponse, ErrorResponse};
use model::entities::{booking, booking_history, client, photographer, staff, user, work_history};
use model::entities::user::UserType;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::handlers::auth::ensure_identity_free;
use crate::handlers::booking_history::BookingHistoryResponse;
use crate::handlers::bookings::BookingResponse;
use crate::handlers::work_history::WorkHistoryResponse;
use crate::schemas::AppState;

/// Account details. The password hash is never included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// 1 = staff, 2 = photographer, 3 = client
    pub user_type: i32,
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            user_type: model.user_type.to_value(),
            is_active: model.is_active,
            date_joined: model.date_joined,
            last_login: model.last_login,
        }
    }
}

/// Request body for updating an account
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(email, length(max = 80))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 45))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub last_name: Option<String>,
}

/// Request body for a photographer's own role details
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdatePhotographerRequest {
    #[validate(range(min = 16, max = 120))]
    pub age: Option<i32>,
    pub bio: Option<String>,
    #[validate(url)]
    pub portfolio_url: Option<String>,
    #[validate(url)]
    pub social_link: Option<String>,
    #[validate(length(max = 34))]
    pub account_number: Option<String>,
    #[validate(length(max = 100))]
    pub bank_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhotographerResponse {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub bio: String,
    pub portfolio_url: Option<String>,
    pub social_link: Option<String>,
    pub account_number: String,
    pub bank_name: String,
    pub is_suspended: bool,
    pub suspended_at: Option<NaiveDateTime>,
    pub work_history: Vec<WorkHistoryResponse>,
}

impl PhotographerResponse {
    fn build(row: photographer::Model, owner: Option<&user::Model>, work_history: Vec<WorkHistoryResponse>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            username: owner.map(|u| u.username.clone()).unwrap_or_default(),
            first_name: owner.map(|u| u.first_name.clone()).unwrap_or_default(),
            last_name: owner.map(|u| u.last_name.clone()).unwrap_or_default(),
            age: row.age,
            bio: row.bio,
            portfolio_url: row.portfolio_url,
            social_link: row.social_link,
            account_number: row.account_number,
            bank_name: row.bank_name,
            is_suspended: row.is_suspended,
            suspended_at: row.suspended_at,
            work_history,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub description: Option<String>,
    pub bookings: Vec<BookingResponse>,
    pub booking_history: Vec<BookingHistoryResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StaffResponse {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub department: Option<String>,
}

async fn users_by_id(state: &AppState) -> ApiResult<HashMap<i32, user::Model>> {
    Ok(user::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

/// Loads a user and checks it has the role the route names.
async fn find_user_of_type(state: &AppState, user_id: i32, user_type: UserType) -> ApiResult<user::Model> {
    trace!("Looking up {} user {}", user_type.label(), user_id);
    match user::Entity::find_by_id(user_id).one(&state.db).await? {
        Some(found) if found.user_type == user_type => Ok(found),
        Some(found) => {
            warn!(
                "User {} is a {}, not a {}",
                user_id,
                found.user_type.label(),
                user_type.label()
            );
            Err(ApiError::not_found(user_type.label(), user_id))
        }
        None => Err(ApiError::not_found(user_type.label(), user_id)),
    }
}

async fn update_user_of_type(
    state: &AppState,
    caller: &AuthUser,
    user_id: i32,
    user_type: UserType,
    request: UpdateUserRequest,
) -> ApiResult<UserResponse> {
    request.validate()?;
    let existing = find_user_of_type(state, user_id, user_type).await?;
    caller.require_self_or_staff(existing.id)?;

    let email = request.email.clone().unwrap_or_else(|| existing.email.clone());
    let username = request
        .username
        .clone()
        .unwrap_or_else(|| existing.username.clone());
    ensure_identity_free(&state.db, &email, &username, Some(existing.id)).await?;

    let mut active: user::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();
    if let Some(email) = request.email {
        active.email = Set(email);
        updated_fields.push("email");
    }
    if let Some(username) = request.username {
        active.username = Set(username);
        updated_fields.push("username");
    }
    if let Some(first_name) = request.first_name {
        active.first_name = Set(first_name);
        updated_fields.push("first_name");
    }
    if let Some(last_name) = request.last_name {
        active.last_name = Set(last_name);
        updated_fields.push("last_name");
    }
    debug!("Updating fields: {}", updated_fields.join(", "));

    let updated = active.update(&state.db).await?;
    info!("User {} updated by {}", user_id, caller.id());
    Ok(UserResponse::from(updated))
}

async fn delete_user_of_type(
    state: &AppState,
    caller: &AuthUser,
    user_id: i32,
    user_type: UserType,
) -> ApiResult<String> {
    let existing = find_user_of_type(state, user_id, user_type).await?;
    caller.require_self_or_staff(existing.id)?;

    let result = user::Entity::delete_by_id(existing.id).exec(&state.db).await?;
    debug!("Delete affected {} rows", result.rows_affected);
    info!("{} user {} deleted by {}", user_type.label(), user_id, caller.id());
    Ok(format!("User {} deleted", user_id))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_users(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    trace!("Entering get_users function");
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} users from database", users.len());
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Users retrieved successfully")))
}

macro_rules! typed_user_routes {
    ($user_type:expr, $path:literal, $get:ident, $update:ident, $delete:ident) => {
        #[utoipa::path(
            get,
            path = $path,
            tag = "users",
            params(("id" = i32, Path, description = "User ID")),
            responses(
                (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
                (status = 404, description = "No such user with this role", body = ErrorResponse)
            ),
            security(("bearer_auth" = []))
        )]
        #[instrument(skip(state, _caller))]
        pub async fn $get(
            ApiPath(id): ApiPath<i32>,
            State(state): State<AppState>,
            _caller: AuthUser,
        ) -> ApiResult<Json<ApiResponse<UserResponse>>> {
            let found = find_user_of_type(&state, id, $user_type).await?;
            Ok(Json(ApiResponse::ok(
                UserResponse::from(found),
                "User retrieved successfully",
            )))
        }

        #[utoipa::path(
            put,
            path = $path,
            tag = "users",
            params(("id" = i32, Path, description = "User ID")),
            request_body = UpdateUserRequest,
            responses(
                (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
                (status = 400, description = "Invalid request", body = ErrorResponse),
                (status = 403, description = "Not your account", body = ErrorResponse),
                (status = 404, description = "No such user with this role", body = ErrorResponse)
            ),
            security(("bearer_auth" = []))
        )]
        #[instrument(skip(state, caller, request))]
        pub async fn $update(
            ApiPath(id): ApiPath<i32>,
            State(state): State<AppState>,
            caller: AuthUser,
            ApiJson(request): ApiJson<UpdateUserRequest>,
        ) -> ApiResult<Json<ApiResponse<UserResponse>>> {
            let updated = update_user_of_type(&state, &caller, id, $user_type, request).await?;
            Ok(Json(ApiResponse::ok(updated, "User updated successfully")))
        }

        #[utoipa::path(
            delete,
            path = $path,
            tag = "users",
            params(("id" = i32, Path, description = "User ID")),
            responses(
                (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
                (status = 403, description = "Not your account", body = ErrorResponse),
                (status = 404, description = "No such user with this role", body = ErrorResponse)
            ),
            security(("bearer_auth" = []))
        )]
        #[instrument(skip(state, caller))]
        pub async fn $delete(
            ApiPath(id): ApiPath<i32>,
            State(state): State<AppState>,
            caller: AuthUser,
        ) -> ApiResult<Json<ApiResponse<String>>> {
            let message = delete_user_of_type(&state, &caller, id, $user_type).await?;
            Ok(Json(ApiResponse::ok(message, "User deleted successfully")))
        }
    };
}

typed_user_routes!(
    UserType::Staff,
    "/api/v1/users/staff/{id}",
    get_staff_user,
    update_staff_user,
    delete_staff_user
);
typed_user_routes!(
    UserType::Photographer,
    "/api/v1/users/photographer/{id}",
    get_photographer_user,
    update_photographer_user,
    delete_photographer_user
);
typed_user_routes!(
    UserType::Client,
    "/api/v1/users/client/{id}",
    get_client_user,
    update_client_user,
    delete_client_user
);

/// List photographers with their work history
#[utoipa::path(
    get,
    path = "/api/v1/photographers",
    tag = "users",
    responses(
        (status = 200, description = "Photographers retrieved successfully", body = ApiResponse<Vec<PhotographerResponse>>)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_photographers(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<PhotographerResponse>>>> {
    trace!("Entering get_photographers function");
    let users = users_by_id(&state).await?;
    let rows = photographer::Entity::find()
        .order_by_asc(photographer::Column::Id)
        .all(&state.db)
        .await?;

    let mut history: HashMap<i32, Vec<WorkHistoryResponse>> = HashMap::new();
    for entry in work_history::Entity::find()
        .order_by_desc(work_history::Column::StartDate)
        .all(&state.db)
        .await?
    {
        history
            .entry(entry.photographer_id)
            .or_default()
            .push(WorkHistoryResponse::from(entry));
    }

    let data: Vec<PhotographerResponse> = rows
        .into_iter()
        .map(|row| {
            let entries = history.remove(&row.user_id).unwrap_or_default();
            let owner = users.get(&row.user_id);
            PhotographerResponse::build(row, owner, entries)
        })
        .collect();
    debug!("Retrieved {} photographers", data.len());
    Ok(Json(ApiResponse::ok(data, "Photographers retrieved successfully")))
}

/// Update the caller's photographer details
#[utoipa::path(
    put,
    path = "/api/v1/photographers/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "Photographer ID")),
    request_body = UpdatePhotographerRequest,
    responses(
        (status = 200, description = "Photographer updated successfully", body = ApiResponse<PhotographerResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not your photographer profile", body = ErrorResponse),
        (status = 404, description = "Photographer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn update_photographer(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<UpdatePhotographerRequest>,
) -> ApiResult<Json<ApiResponse<PhotographerResponse>>> {
    trace!("Entering update_photographer function for id: {}", id);
    request.validate()?;

    let row = photographer::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Photographer", id))?;
    caller.require_self_or_staff(row.user_id)?;

    let user_id = row.user_id;
    let mut active: photographer::ActiveModel = row.into();
    if let Some(age) = request.age {
        active.age = Set(Some(age));
    }
    if let Some(bio) = request.bio {
        active.bio = Set(bio);
    }
    if let Some(url) = request.portfolio_url {
        active.portfolio_url = Set(Some(url));
    }
    if let Some(link) = request.social_link {
        active.social_link = Set(Some(link));
    }
    if let Some(number) = request.account_number {
        active.account_number = Set(number);
    }
    if let Some(bank) = request.bank_name {
        active.bank_name = Set(bank);
    }
    let updated = active.update(&state.db).await?;

    let owner = user::Entity::find_by_id(user_id).one(&state.db).await?;
    let entries = work_history::Entity::find()
        .filter(work_history::Column::PhotographerId.eq(user_id))
        .order_by_desc(work_history::Column::StartDate)
        .all(&state.db)
        .await?
        .into_iter()
        .map(WorkHistoryResponse::from)
        .collect();

    info!("Photographer {} updated", id);
    Ok(Json(ApiResponse::ok(
        PhotographerResponse::build(updated, owner.as_ref(), entries),
        "Photographer updated successfully",
    )))
}

/// List clients with their bookings and booking history
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    tag = "users",
    responses(
        (status = 200, description = "Clients retrieved successfully", body = ApiResponse<Vec<ClientResponse>>)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_clients(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<ClientResponse>>>> {
    trace!("Entering get_clients function");
    let users = users_by_id(&state).await?;
    let rows = client::Entity::find()
        .order_by_asc(client::Column::Id)
        .all(&state.db)
        .await?;

    let mut bookings: HashMap<i32, Vec<BookingResponse>> = HashMap::new();
    for b in booking::Entity::find()
        .order_by_desc(booking::Column::CreatedAt)
        .all(&state.db)
        .await?
    {
        bookings.entry(b.client_id).or_default().push(BookingResponse::from(b));
    }

    let mut history: HashMap<i32, Vec<BookingHistoryResponse>> = HashMap::new();
    for h in booking_history::Entity::find()
        .order_by_desc(booking_history::Column::CreatedAt)
        .all(&state.db)
        .await?
    {
        history
            .entry(h.client_id)
            .or_default()
            .push(BookingHistoryResponse::from(h));
    }

    let data: Vec<ClientResponse> = rows
        .into_iter()
        .map(|row| {
            let owner = users.get(&row.user_id);
            ClientResponse {
                id: row.id,
                user_id: row.user_id,
                username: owner.map(|u| u.username.clone()).unwrap_or_default(),
                first_name: owner.map(|u| u.first_name.clone()).unwrap_or_default(),
                last_name: owner.map(|u| u.last_name.clone()).unwrap_or_default(),
                description: row.description,
                bookings: bookings.remove(&row.user_id).unwrap_or_default(),
                booking_history: history.remove(&row.user_id).unwrap_or_default(),
            }
        })
        .collect();
    debug!("Retrieved {} clients", data.len());
    Ok(Json(ApiResponse::ok(data, "Clients retrieved successfully")))
}

/// List staff members
#[utoipa::path(
    get,
    path = "/api/v1/staff",
    tag = "users",
    responses(
        (status = 200, description = "Staff retrieved successfully", body = ApiResponse<Vec<StaffResponse>>)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_staff(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<StaffResponse>>>> {
    let users = users_by_id(&state).await?;
    let data: Vec<StaffResponse> = staff::Entity::find()
        .order_by_asc(staff::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|row| {
            let owner = users.get(&row.user_id);
            StaffResponse {
                id: row.id,
                user_id: row.user_id,
                username: owner.map(|u| u.username.clone()).unwrap_or_default(),
                email: owner.map(|u| u.email.clone()).unwrap_or_default(),
                first_name: owner.map(|u| u.first_name.clone()).unwrap_or_default(),
                last_name: owner.map(|u| u.last_name.clone()).unwrap_or_default(),
                phone: row.phone,
                department: row.department,
            }
        })
        .collect();
    Ok(Json(ApiResponse::ok(data, "Staff retrieved successfully")))
}
