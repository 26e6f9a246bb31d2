//! # Error Handling
//!
//! Data-layer failures ([`DataError`]) and the problem+json response type
//! ([`ApiError`]) returned by the JSON endpoints, with trace ID propagation.

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::telemetry;

/// Failures raised while reading site content from the database or the cinema feed.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("remote store error: {0}")]
    Remote(#[from] sea_orm::DbErr),
    #[error("cinema feed request failed: {0}")]
    Feed(#[from] reqwest::Error),
    #[error("cinema feed returned status {status}")]
    FeedStatus { status: u16 },
    #[error("could not decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },
    #[error("{0} not found")]
    NotFound(String),
}

impl DataError {
    pub fn not_found(what: impl Into<String>) -> Self {
        DataError::NotFound(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }
}

/// Unified API error response structure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip_serializing, skip_deserializing)]
    pub status: StatusCode,
    /// Error code for programmatic handling
    pub code: Box<str>,
    /// Human-readable error message
    pub message: Box<str>,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<serde_json::Value>>,
    /// Suggested retry delay in seconds (optional)
    pub retry_after: Option<u64>,
    /// Correlation trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<Box<str>>,
}

impl ApiError {
    /// Create a new API error with the given status code and message
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into().into_boxed_str(),
            message: message.into().into_boxed_str(),
            details: None,
            retry_after: None,
            trace_id: Self::current_trace_id(),
        }
    }

    /// Add details to the error
    pub fn with_details<V: Into<serde_json::Value>>(mut self, details: V) -> Self {
        self.details = Some(Box::new(details.into()));
        self
    }

    /// Set retry after delay
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Trace id of the current request, or a short generated correlation id outside one.
    fn current_trace_id() -> Option<Box<str>> {
        telemetry::current_trace_id()
            .map(|trace_id| trace_id.into_boxed_str())
            .or_else(|| {
                Some(format!("corr-{}", &uuid::Uuid::new_v4().to_string()[..8]).into_boxed_str())
            })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/problem+json"),
        );

        if let Some(retry_after) = self.retry_after
            && let Ok(header_value) = HeaderValue::from_str(&retry_after.to_string())
        {
            headers.insert("retry-after", header_value);
        }

        (self.status, headers, axum::Json(self)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing 'Content-Type: application/json' header".to_string()
            }
            _ => "Invalid request body".to_string(),
        };

        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }
}

impl From<DataError> for ApiError {
    fn from(error: DataError) -> Self {
        match error {
            DataError::NotFound(what) => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found", what),
            ),
            DataError::Remote(sea_orm::DbErr::Conn(err)) => {
                tracing::error!("Database connection error: {:?}", err);
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Content store is unavailable",
                )
            }
            DataError::Feed(_) | DataError::FeedStatus { .. } => {
                tracing::error!(error = %error, "Cinema feed error");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "FEED_ERROR",
                    "Cinema schedule feed is unavailable",
                )
            }
            other => {
                tracing::error!(error = %other, "Data layer error");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Data error occurred",
                )
            }
        }
    }
}

/// Create a validation error (422) with field details
pub fn validation_error(message: &str, field_errors: serde_json::Value) -> ApiError {
    ApiError::new(
        StatusCode::UNPROCESSABLE_ENTITY,
        "VALIDATION_FAILED",
        message,
    )
    .with_details(field_errors)
}

/// Create a rate limit error (429) carrying `Retry-After`
pub fn rate_limited(retry_after_seconds: u64) -> ApiError {
    ApiError::new(
        StatusCode::TOO_MANY_REQUESTS,
        "RATE_LIMITED",
        format!(
            "Please wait {} seconds before submitting again",
            retry_after_seconds
        ),
    )
    .with_retry_after(retry_after_seconds)
}

/// Create a submission failure error (502); the client decides whether to retry
pub fn submission_failed() -> ApiError {
    ApiError::new(
        StatusCode::BAD_GATEWAY,
        "SUBMISSION_FAILED",
        "Your enquiry could not be submitted, please try again",
    )
}
