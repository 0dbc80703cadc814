//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the JSON error body is produced.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use giftcard_lookup_core::EmailError;
use serde::Serialize;
use thiserror::Error;

use crate::services::LookupError;
use crate::shopify::ShopifyError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request was invalid.
    #[error(transparent)]
    Validation(#[from] EmailError),

    /// A Shopify call failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Shopify(e) => Self::Shopify(e),
            LookupError::Aggregate(e) => Self::Internal(e.to_string()),
        }
    }
}

/// JSON error body. Always carries `error`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            details: None,
        }
    }
}

impl AppError {
    /// HTTP status the error maps to.
    ///
    /// Upstream non-success statuses are passed through unchanged.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Shopify(ShopifyError::Request { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Shopify(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Shopify(ShopifyError::Request { status, body }) => ErrorBody {
                error: "Shopify request failed".to_string(),
                status: Some(*status),
                details: Some(body.clone()),
            },
            _ => ErrorBody::new(self.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Shopify(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                upstream_status = self.status().as_u16(),
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(self.body())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use giftcard_lookup_core::AggregateError;
    use serde_json::{Value, json};

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error() {
        let (status, body) = render(EmailError::Empty.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Email missing"}));
    }

    #[tokio::test]
    async fn test_upstream_status_passes_through() {
        let err = ShopifyError::Request {
            status: 429,
            body: r#"{"errors":"Exceeded 2 calls per second for api client."}"#.to_string(),
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body,
            json!({
                "error": "Shopify request failed",
                "status": 429,
                "details": r#"{"errors":"Exceeded 2 calls per second for api client."}"#
            })
        );
    }

    #[tokio::test]
    async fn test_nonstandard_upstream_status() {
        let err = ShopifyError::Request {
            status: 430,
            body: String::new(),
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status.as_u16(), 430);
        assert_eq!(body["status"], json!(430));
    }

    #[tokio::test]
    async fn test_parse_error_is_500() {
        let parse = serde_json::from_str::<Value>("<html>").unwrap_err();
        let (status, body) = render(ShopifyError::Parse(parse).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("JSON parse error"));
        assert!(body.get("status").is_none());
    }

    #[tokio::test]
    async fn test_page_limit_is_500() {
        let (status, body) = render(ShopifyError::PageLimitExceeded(1000).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Pagination aborted after 1000 pages"}));
    }

    #[tokio::test]
    async fn test_balance_overflow_is_500() {
        let err = LookupError::from(AggregateError::BalanceOverflow { cards: 2 });
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Total balance overflowed across 2 active cards"}));
    }

    #[tokio::test]
    async fn test_lookup_upstream_error_keeps_status() {
        let err = LookupError::from(ShopifyError::Request {
            status: 503,
            body: "maintenance".to_string(),
        });
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["details"], json!("maintenance"));
    }

    #[tokio::test]
    async fn test_invalid_header_is_500() {
        let (status, body) = render(ShopifyError::InvalidHeader("Link: bad bytes".to_string()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Invalid response header: Link: bad bytes"}));
    }
}
