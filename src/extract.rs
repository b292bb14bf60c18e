//! Request extractors whose rejections render as `ErrorResponse`.
//!
//! axum's own `Json`, `Path` and `Query` reject with plain-text bodies;
//! these wrappers route every rejection through [`ApiError`].

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query},
    http::request::Parts,
};
use axum_valid::{HasValidate, Valid, ValidationRejection};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::ApiError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

impl<T> HasValidate for ApiQuery<T> {
    type Validate = T;

    fn get_validate(&self) -> &T {
        &self.0
    }
}

/// Query string checked with `validator` before the handler runs.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Valid(ApiQuery(query)) = Valid::<ApiQuery<T>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection {
                ValidationRejection::Valid(errors) => ApiError::from(errors),
                ValidationRejection::Inner(inner) => inner,
            })?;
        Ok(Self(query))
    }
}
