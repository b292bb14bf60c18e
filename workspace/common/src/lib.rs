//! Common transport-layer types shared by every API handler and by clients
//! of the API. Handler-specific request and response bodies live next to
//! their handlers; the envelope, paging and token shapes live here.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Default page size when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Generic API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Paging parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema, Validate)]
pub struct PageQuery {
    /// Page number, starting at 1 (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<u64>,
}

impl PageQuery {
    /// Zero-based page index as used by sea-orm paginators.
    pub fn page_index(&self) -> u64 {
        self.page.unwrap_or(1).saturating_sub(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Access and refresh token issued on signup and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// A freshly minted access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page_index(), 0);
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);

        let third = PageQuery {
            page: Some(3),
            page_size: Some(10),
        };
        assert_eq!(third.page_index(), 2);
        assert_eq!(third.page_size(), 10);
    }

    #[test]
    fn page_query_rejects_zero_page() {
        let query = PageQuery {
            page: Some(0),
            page_size: None,
        };
        assert!(query.validate().is_err());

        let too_big = PageQuery {
            page: Some(1),
            page_size: Some(500),
        };
        assert!(too_big.validate().is_err());
    }

    #[test]
    fn api_response_serializes_envelope() {
        let response = ApiResponse::ok(vec![1, 2], "Listed");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Listed");
        assert_eq!(json["data"][1], 2);
    }
}
