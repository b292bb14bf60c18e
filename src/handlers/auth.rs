use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use common::{AccessToken, ApiResponse, ErrorResponse, TokenPair};
use model::entities::{client, photographer, profile, staff, user};
use model::entities::profile::ProfileType;
use model::entities::user::UserType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{decode_token, hash_password, issue_token, issue_token_pair, verify_password, TokenKind};
use crate::errors::{is_unique_violation, ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::schemas::AppState;

/// Request body for creating an account
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct SignupRequest {
    #[validate(email, length(max = 80))]
    pub email: String,
    #[validate(length(min = 1, max = 45))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 80))]
    pub first_name: String,
    #[validate(length(min = 1, max = 80))]
    pub last_name: String,
    /// 1 = staff, 2 = photographer, 3 = client
    pub user_type: i32,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VerifyRequest {
    pub token: String,
}

pub(crate) fn parse_user_type(code: i32) -> ApiResult<UserType> {
    match code {
        1 => Ok(UserType::Staff),
        2 => Ok(UserType::Photographer),
        3 => Ok(UserType::Client),
        _ => Err(ApiError::bad_request("INVALID_USER_TYPE", "Invalid user type")),
    }
}

/// Fails when another account already uses `email` or `username`.
pub(crate) async fn ensure_identity_free<C: sea_orm::ConnectionTrait>(
    db: &C,
    email: &str,
    username: &str,
    except_user: Option<i32>,
) -> ApiResult<()> {
    let mut by_email = user::Entity::find().filter(user::Column::Email.eq(email));
    let mut by_username = user::Entity::find().filter(user::Column::Username.eq(username));
    if let Some(id) = except_user {
        by_email = by_email.filter(user::Column::Id.ne(id));
        by_username = by_username.filter(user::Column::Id.ne(id));
    }

    if by_email.one(db).await?.is_some() {
        return Err(ApiError::bad_request("EMAIL_TAKEN", "Email has already been used"));
    }
    if by_username.one(db).await?.is_some() {
        return Err(ApiError::bad_request(
            "USERNAME_TAKEN",
            "Username has already been used",
        ));
    }
    Ok(())
}

/// Inserts the role row for `user_type` unless the user already has one.
pub(crate) async fn ensure_role_row(
    txn: &DatabaseTransaction,
    user_id: i32,
    user_type: UserType,
) -> ApiResult<()> {
    match user_type {
        UserType::Staff => {
            if staff::Entity::find()
                .filter(staff::Column::UserId.eq(user_id))
                .one(txn)
                .await?
                .is_none()
            {
                staff::ActiveModel {
                    user_id: Set(user_id),
                    phone: Set(None),
                    department: Set(None),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
            }
        }
        UserType::Photographer => {
            if photographer::Entity::find()
                .filter(photographer::Column::UserId.eq(user_id))
                .one(txn)
                .await?
                .is_none()
            {
                photographer::ActiveModel {
                    user_id: Set(user_id),
                    age: Set(None),
                    bio: Set(String::new()),
                    portfolio_url: Set(None),
                    social_link: Set(None),
                    account_number: Set(String::new()),
                    bank_name: Set(String::new()),
                    is_suspended: Set(false),
                    suspended_at: Set(None),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
            }
        }
        UserType::Client => {
            if client::Entity::find()
                .filter(client::Column::UserId.eq(user_id))
                .one(txn)
                .await?
                .is_none()
            {
                client::ActiveModel {
                    user_id: Set(user_id),
                    description: Set(None),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
            }
        }
    }
    Ok(())
}

/// Deletes the role row of `user_type`. Rows hanging off it (bookings,
/// notifications, job posts) cascade with it.
pub(crate) async fn remove_role_row(
    txn: &DatabaseTransaction,
    user_id: i32,
    user_type: UserType,
) -> ApiResult<u64> {
    let result = match user_type {
        UserType::Staff => {
            staff::Entity::delete_many()
                .filter(staff::Column::UserId.eq(user_id))
                .exec(txn)
                .await?
        }
        UserType::Photographer => {
            photographer::Entity::delete_many()
                .filter(photographer::Column::UserId.eq(user_id))
                .exec(txn)
                .await?
        }
        UserType::Client => {
            client::Entity::delete_many()
                .filter(client::Column::UserId.eq(user_id))
                .exec(txn)
                .await?
        }
    };
    debug!(
        "Removed {} {} role rows of user {}",
        result.rows_affected,
        user_type.label(),
        user_id
    );
    Ok(result.rows_affected)
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<TokenPair>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TokenPair>>)> {
    trace!("Entering signup function");
    let user_type = parse_user_type(request.user_type)?;
    request.validate()?;

    ensure_identity_free(&state.db, &request.email, &request.username, None).await?;
    let password_hash = hash_password(&request.password)?;

    let txn = state.db.begin().await?;
    let new_user = user::ActiveModel {
        email: Set(request.email.clone()),
        username: Set(request.username.clone()),
        password_hash: Set(password_hash),
        first_name: Set(request.first_name.clone()),
        last_name: Set(request.last_name.clone()),
        user_type: Set(user_type),
        is_active: Set(true),
        date_joined: Set(Utc::now().naive_utc()),
        last_login: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::bad_request("EMAIL_TAKEN", "Email has already been used")
        } else {
            ApiError::Database(e)
        }
    })?;
    debug!("Inserted user {} as {}", new_user.id, user_type.label());

    ensure_role_row(&txn, new_user.id, user_type).await?;

    let profile_type = match user_type {
        UserType::Photographer => Some(ProfileType::Photographer),
        UserType::Client => Some(ProfileType::Client),
        UserType::Staff => None,
    };
    if let Some(profile_type) = profile_type {
        profile::ActiveModel {
            user_id: Set(new_user.id),
            profile_type: Set(profile_type),
            phone: Set(None),
            location: Set(None),
            image_url: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    let tokens = issue_token_pair(&state.settings, new_user.id)?;
    info!("User {} registered as {}", new_user.id, user_type.label());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(tokens, "User created successfully")),
    ))
}

/// Exchange credentials for a token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenPair>),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<TokenPair>>> {
    trace!("Entering login function");
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request(
            "MISSING_CREDENTIALS",
            "Email and password are required",
        ));
    }

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());
    let found = user::Entity::find()
        .filter(user::Column::Email.eq(request.email.trim()))
        .one(&state.db)
        .await?
        .ok_or_else(invalid)?;

    if !found.is_active || !verify_password(&request.password, &found.password_hash) {
        warn!("Failed login attempt for user {}", found.id);
        return Err(invalid());
    }

    let user_id = found.id;
    let mut active: user::ActiveModel = found.into();
    active.last_login = Set(Some(Utc::now().naive_utc()));
    active.update(&state.db).await?;

    let tokens = issue_token_pair(&state.settings, user_id)?;
    info!("User {} logged in", user_id);
    Ok(Json(ApiResponse::ok(tokens, "Login Successful")))
}

/// Revoke a refresh token
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<String>),
        (status = 400, description = "Invalid token", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn logout(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering logout function");
    let claims = decode_token(&state.settings, &request.refresh_token, TokenKind::Refresh)
        .map_err(|_| ApiError::bad_request("INVALID_TOKEN", "Invalid token or logout failed"))?;

    state.cache.insert(claims.jti.clone(), ()).await;
    info!("Refresh token {} blacklisted for user {}", claims.jti, claims.sub);
    Ok(Json(ApiResponse::ok(
        "logged out".to_string(),
        "Logged out successfully",
    )))
}

/// Mint a new access token from a refresh token
#[utoipa::path(
    post,
    path = "/api/v1/auth/token/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed", body = ApiResponse<AccessToken>),
        (status = 401, description = "Invalid, expired or revoked token", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<AccessToken>>> {
    trace!("Entering refresh_token function");
    let claims = decode_token(&state.settings, &request.refresh_token, TokenKind::Refresh)?;
    if state.cache.contains_key(&claims.jti) {
        warn!("Blacklisted refresh token {} presented", claims.jti);
        return Err(ApiError::Unauthorized("Token is blacklisted".to_string()));
    }

    let user_id = claims.user_id()?;
    let access_token = issue_token(&state.settings, user_id, TokenKind::Access)?;
    debug!("Issued new access token for user {}", user_id);
    Ok(Json(ApiResponse::ok(
        AccessToken { access_token },
        "Token refreshed successfully",
    )))
}

/// Check whether a token is valid
#[utoipa::path(
    post,
    path = "/api/v1/auth/token/verify",
    tag = "auth",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Token is valid", body = ApiResponse<String>),
        (status = 401, description = "Token is invalid", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn verify_token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerifyRequest>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let claims = decode_token(&state.settings, &request.token, TokenKind::Access)
        .or_else(|_| decode_token(&state.settings, &request.token, TokenKind::Refresh))?;
    if claims.kind == TokenKind::Refresh && state.cache.contains_key(&claims.jti) {
        return Err(ApiError::Unauthorized("Token is blacklisted".to_string()));
    }
    Ok(Json(ApiResponse::ok(claims.sub, "Token is valid")))
}
