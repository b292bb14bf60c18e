use axum::{
    extract::State,
    response::Json,
};
use chrono::Utc;
use common::{ApiResponse, ErrorResponse};
use model::entities::profile::{self, ProfileType};
use model::entities::{profile_switch, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{decode_switch_token, issue_switch_token_at, AuthUser};
use crate::errors::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::handlers::auth::{ensure_role_row, remove_role_row};
use crate::schemas::AppState;

pub const SWITCH_SUBJECT: &str = "Confirmation for Profile Switch";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub user_id: i32,
    /// photographer or client
    pub profile_type: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

impl From<profile::Model> for ProfileResponse {
    fn from(model: profile::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            profile_type: model.profile_type.as_selection().to_string(),
            phone: model.phone,
            location: model.location,
            image_url: model.image_url,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProfileSwitchRequest {
    /// client or photographer
    pub selected_profile: String,
}

async fn find_profile(state: &AppState, id: i32) -> ApiResult<profile::Model> {
    profile::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile", id))
}

/// List profiles
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    tag = "profiles",
    responses(
        (status = 200, description = "Profiles retrieved successfully", body = ApiResponse<Vec<ProfileResponse>>)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_profiles(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<ProfileResponse>>>> {
    let profiles = profile::Entity::find()
        .order_by_asc(profile::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} profiles", profiles.len());
    let data = profiles.into_iter().map(ProfileResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Profiles retrieved successfully")))
}

/// Get a profile
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    tag = "profiles",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponse>),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_profile(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<ApiResponse<ProfileResponse>>> {
    let found = find_profile(&state, id).await?;
    Ok(Json(ApiResponse::ok(
        ProfileResponse::from(found),
        "Profile retrieved successfully",
    )))
}

/// Edit contact details of a profile
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}",
    tag = "profiles",
    params(("id" = i32, Path, description = "Profile ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not your profile", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, request))]
pub async fn update_profile(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<ProfileResponse>>> {
    let found = find_profile(&state, id).await?;
    caller.require_self_or_staff(found.user_id)?;
    request.validate()?;

    let mut active: profile::ActiveModel = found.into();
    if let Some(phone) = request.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(location) = request.location {
        active.location = Set(Some(location));
    }
    if let Some(url) = request.image_url {
        active.image_url = Set(Some(url));
    }
    let updated = active.update(&state.db).await?;
    info!("Profile {} updated by user {}", id, caller.id());
    Ok(Json(ApiResponse::ok(
        ProfileResponse::from(updated),
        "Profile updated successfully",
    )))
}

/// Delete a profile
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{id}",
    tag = "profiles",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Not your profile", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn delete_profile(
    ApiPath(id): ApiPath<i32>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let found = find_profile(&state, id).await?;
    caller.require_self_or_staff(found.user_id)?;
    profile::Entity::delete_by_id(id).exec(&state.db).await?;
    info!("Profile {} deleted by user {}", id, caller.id());
    Ok(Json(ApiResponse::ok(
        format!("Profile {} deleted", id),
        "Profile deleted successfully",
    )))
}

/// Ask to move the caller to the other side of the marketplace
///
/// Emails a single-use confirmation link; nothing changes until it is opened.
#[utoipa::path(
    post,
    path = "/api/v1/profile-switch",
    tag = "profiles",
    request_body = ProfileSwitchRequest,
    responses(
        (status = 200, description = "Verification email sent", body = ApiResponse<String>),
        (status = 400, description = "Invalid selection or staff account", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn request_profile_switch(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<ProfileSwitchRequest>,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering request_profile_switch function");
    if caller.is_staff() {
        return Err(ApiError::bad_request(
            "PROFILE_SWITCH_NOT_ALLOWED",
            "Staff accounts can not switch profiles",
        ));
    }
    let selected = ProfileType::from_selection(&request.selected_profile).ok_or_else(|| {
        ApiError::bad_request("INVALID_PROFILE_SELECTION", "Invalid profile selection")
    })?;

    let own_profile = profile::Entity::find()
        .filter(profile::Column::UserId.eq(caller.id()))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request("PROFILE_MISSING", "No profile exists for this account")
        })?;

    let now = Utc::now();
    let token = issue_switch_token_at(&state.settings, caller.id(), selected.as_selection(), now)?;

    let existing = profile_switch::Entity::find()
        .filter(profile_switch::Column::UserId.eq(caller.id()))
        .one(&state.db)
        .await?;
    let mut active: profile_switch::ActiveModel = match existing {
        Some(row) => row.into(),
        None => profile_switch::ActiveModel {
            user_id: Set(caller.id()),
            ..Default::default()
        },
    };
    active.active_profile_id = Set(own_profile.id);
    active.selected_profile = Set(Some(selected.as_selection().to_string()));
    active.email_validation_token = Set(Some(token.clone()));
    active.is_verified = Set(false);
    active.requested_at = Set(Some(now.naive_utc()));
    active.save(&state.db).await?;
    debug!("Stored switch token for user {}", caller.id());

    let link = format!(
        "{}/api/v1/confirm-switch-profile/{}/{}",
        state.settings.public_base_url.trim_end_matches('/'),
        selected.as_selection(),
        token
    );
    let body = format!(
        "Click the following link to confirm your profile switch: {}",
        link
    );
    state
        .mailer
        .send(&caller.0.email, SWITCH_SUBJECT, &body)
        .await
        .map_err(|e| ApiError::bad_request("EMAIL_FAILED", e.to_string()))?;

    info!(
        "Profile switch to {} requested by user {}",
        selected.as_selection(),
        caller.id()
    );
    Ok(Json(ApiResponse::ok(
        selected.as_selection().to_string(),
        "Verification email sent",
    )))
}

/// Complete a profile switch from the emailed link
#[utoipa::path(
    get,
    path = "/api/v1/confirm-switch-profile/{selected_profile}/{token}",
    tag = "profiles",
    params(
        ("selected_profile" = String, Path, description = "client or photographer"),
        ("token" = String, Path, description = "Emailed verification token"),
    ),
    responses(
        (status = 200, description = "Profile switched successfully", body = ApiResponse<String>),
        (status = 400, description = "Switch not initiated, invalid token or invalid selection", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller, token))]
pub async fn confirm_profile_switch(
    ApiPath((selected_profile, token)): ApiPath<(String, String)>,
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering confirm_profile_switch function");
    let switch = profile_switch::Entity::find()
        .filter(profile_switch::Column::UserId.eq(caller.id()))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request("PROFILE_SWITCH_NOT_INITIATED", "Profile switch not initiated")
        })?;

    let invalid_token = || ApiError::bad_request("INVALID_VERIFICATION_TOKEN", "Invalid verification token");
    if switch.email_validation_token.as_deref() != Some(token.as_str()) {
        warn!("Switch token mismatch for user {}", caller.id());
        return Err(invalid_token());
    }
    let claims = decode_switch_token(&state.settings, &token).ok_or_else(invalid_token)?;
    if claims.user_id != caller.id() {
        return Err(invalid_token());
    }

    let invalid_selection = || ApiError::bad_request("INVALID_PROFILE_SELECTION", "Invalid profile selection");
    let selected = ProfileType::from_selection(&selected_profile).ok_or_else(invalid_selection)?;
    if claims.selected_profile != selected.as_selection() {
        return Err(invalid_selection());
    }

    let txn = state.db.begin().await?;
    let own_profile = profile::Entity::find_by_id(switch.active_profile_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile", switch.active_profile_id))?;
    let mut profile_active: profile::ActiveModel = own_profile.into();
    profile_active.profile_type = Set(selected);
    profile_active.update(&txn).await?;

    let mut user_active: user::ActiveModel = caller.0.clone().into();
    user_active.user_type = Set(selected.user_type());
    user_active.update(&txn).await?;

    ensure_role_row(&txn, caller.id(), selected.user_type()).await?;
    if caller.user_type() != selected.user_type() {
        remove_role_row(&txn, caller.id(), caller.user_type()).await?;
    }

    let mut switch_active: profile_switch::ActiveModel = switch.into();
    switch_active.is_verified = Set(true);
    switch_active.email_validation_token = Set(None);
    switch_active.update(&txn).await?;
    txn.commit().await?;

    info!(
        "User {} switched from {} to {}",
        caller.id(),
        caller.user_type().label(),
        selected.user_type().label()
    );
    Ok(Json(ApiResponse::ok(
        selected.as_selection().to_string(),
        "Profile switched successfully",
    )))
}
