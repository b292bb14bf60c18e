//! Password hashing, JSON web tokens and the authenticated-user extractor.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user::{self, UserType};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::errors::{ApiError, ApiResult};
use crate::schemas::AppState;

pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> ApiResult<i32> {
        self.sub
            .parse()
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation
}

pub fn issue_token_at(
    settings: &Settings,
    user_id: i32,
    kind: TokenKind,
    now: DateTime<Utc>,
) -> ApiResult<String> {
    let ttl = match kind {
        TokenKind::Access => TimeDelta::minutes(settings.access_token_ttl_minutes),
        TokenKind::Refresh => TimeDelta::days(settings.refresh_token_ttl_days),
    };
    let claims = Claims {
        sub: user_id.to_string(),
        kind,
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
}

pub fn issue_token(settings: &Settings, user_id: i32, kind: TokenKind) -> ApiResult<String> {
    issue_token_at(settings, user_id, kind, Utc::now())
}

pub fn issue_token_pair(settings: &Settings, user_id: i32) -> ApiResult<common::TokenPair> {
    Ok(common::TokenPair {
        access_token: issue_token(settings, user_id, TokenKind::Access)?,
        refresh_token: issue_token(settings, user_id, TokenKind::Refresh)?,
    })
}

/// Decodes a token and checks it is of the expected kind.
pub fn decode_token(settings: &Settings, token: &str, expected: TokenKind) -> ApiResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        ApiError::Unauthorized("Token is invalid or expired".to_string())
    })?;

    if data.claims.kind != expected {
        debug!("Token kind {:?} used where {:?} expected", data.claims.kind, expected);
        return Err(ApiError::Unauthorized("Token is invalid or expired".to_string()));
    }
    Ok(data.claims)
}

/// Claims of the emailed profile-switch confirmation token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwitchClaims {
    pub user_id: i32,
    pub selected_profile: String,
    pub exp: i64,
}

pub fn issue_switch_token_at(
    settings: &Settings,
    user_id: i32,
    selected_profile: &str,
    now: DateTime<Utc>,
) -> ApiResult<String> {
    let claims = SwitchClaims {
        user_id,
        selected_profile: selected_profile.to_string(),
        exp: (now + TimeDelta::hours(settings.verification_token_ttl_hours)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to sign verification token: {}", e)))
}

pub fn decode_switch_token(settings: &Settings, token: &str) -> Option<SwitchClaims> {
    decode::<SwitchClaims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation(),
    )
    .map(|data| data.claims)
    .map_err(|e| debug!("Verification token rejected: {}", e))
    .ok()
}

/// The caller, resolved from the `Authorization: Bearer` access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl AuthUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }

    pub fn user_type(&self) -> UserType {
        self.0.user_type
    }

    pub fn is_staff(&self) -> bool {
        self.0.user_type == UserType::Staff
    }

    /// Fails with 403 and `message` unless the caller has `user_type`.
    pub fn require(&self, user_type: UserType, message: &str) -> ApiResult<()> {
        if self.0.user_type == user_type {
            Ok(())
        } else {
            warn!(
                "User {} ({}) denied: {}",
                self.0.id,
                self.0.user_type.label(),
                message
            );
            Err(ApiError::Forbidden(message.to_string()))
        }
    }

    /// Fails with 403 unless the caller is `owner_id` or staff.
    pub fn require_self_or_staff(&self, owner_id: i32) -> ApiResult<()> {
        if self.0.id == owner_id || self.is_staff() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        trace!("Authenticating request");
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized("Authentication credentials were not provided".to_string())
            })?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Expected a Bearer token".to_string()))?;

        let claims = decode_token(&state.settings, token, TokenKind::Access)?;
        let user_id = claims.user_id()?;

        let user = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| ApiError::Unauthorized("User not found or inactive".to_string()))?;

        debug!("Authenticated user {} ({})", user.id, user.user_type.label());
        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let settings = Settings::default();
        let refresh = issue_token(&settings, 42, TokenKind::Refresh).unwrap();

        let claims = decode_token(&settings, &refresh, TokenKind::Refresh).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert!(decode_token(&settings, &refresh, TokenKind::Access).is_err());
    }

    #[test]
    fn expired_and_foreign_tokens_are_rejected() {
        let settings = Settings::default();
        let past = Utc::now() - TimeDelta::days(30);
        let expired = issue_token_at(&settings, 1, TokenKind::Access, past).unwrap();
        assert!(decode_token(&settings, &expired, TokenKind::Access).is_err());

        let other = Settings {
            jwt_secret: "another-secret".to_string(),
            ..Settings::default()
        };
        let foreign = issue_token(&other, 1, TokenKind::Access).unwrap();
        assert!(decode_token(&settings, &foreign, TokenKind::Access).is_err());
    }

    #[test]
    fn switch_token_expires_after_ttl() {
        let settings = Settings::default();
        let fresh = issue_switch_token_at(&settings, 3, "client", Utc::now()).unwrap();
        let claims = decode_switch_token(&settings, &fresh).unwrap();
        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.selected_profile, "client");

        let stale = issue_switch_token_at(&settings, 3, "client", Utc::now() - TimeDelta::hours(25))
            .unwrap();
        assert!(decode_switch_token(&settings, &stale).is_none());
    }
}
