//! Shared API types and utilities
//!
//! This module contains the request body, error handling, and conversion
//! utilities used across all API endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use email_finder_core::{FindRequest, FinderError, VerificationResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Request body for POST /v1/find
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FindEmailRequest {
    /// Person's full name (e.g., "John Smith")
    pub full_name: String,
    /// Company website or bare domain (e.g., "https://www.example.com")
    pub company_website: String,
    /// Credential forwarded to the verification oracle
    pub token: String,
}

impl From<FindEmailRequest> for FindRequest {
    fn from(request: FindEmailRequest) -> Self {
        FindRequest {
            full_name: request.full_name,
            company_website: request.company_website,
            token: request.token,
        }
    }
}

/// Successful responses are a one-element array
pub type FindEmailResponse = Vec<VerificationResult>;

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    pub request_id: String,
    pub timestamp: String,
    pub details: Option<HashMap<String, String>>,
}

/// Result type for API handlers
pub type ApiResult<T> = Result<Json<T>, ApiFailure>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    NoCandidates,
    VerificationFailed { ver_ops: u32 },
    Unauthorized(String),
    RequestTooLarge,
    InternalError(String),
}

impl ApiError {
    /// Attach the request id reported back to the caller
    pub fn with_request_id(self, request_id: impl Into<String>) -> ApiFailure {
        ApiFailure {
            error: self,
            request_id: request_id.into(),
        }
    }

    fn parts(self) -> (StatusCode, &'static str, String, Option<HashMap<String, String>>) {
        match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg, None),
            ApiError::NoCandidates => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_CANDIDATES",
                "No valid candidate address could be built from the input".to_string(),
                None,
            ),
            ApiError::VerificationFailed { ver_ops } => (
                StatusCode::BAD_GATEWAY,
                "VERIFICATION_FAILED",
                "The verification service gave no usable answer".to_string(),
                Some(HashMap::from([("ver_ops".to_string(), ver_ops.to_string())])),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            ApiError::RequestTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "REQUEST_TOO_LARGE",
                "Request body too large".to_string(),
                None,
            ),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg, None)
            }
        }
    }
}

impl From<FinderError> for ApiError {
    fn from(err: FinderError) -> Self {
        match err {
            FinderError::MissingToken => {
                ApiError::InvalidInput("Verification token is required".to_string())
            }
            FinderError::UnparsableInput(msg) => ApiError::InvalidInput(msg),
            FinderError::NoCandidates => ApiError::NoCandidates,
            FinderError::Indeterminate { ver_ops } => ApiError::VerificationFailed { ver_ops },
            FinderError::ConfigurationError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// An [`ApiError`] tied to the request it answers
#[derive(Debug)]
pub struct ApiFailure {
    pub error: ApiError,
    pub request_id: String,
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = self.error.parts();

        let error_response = ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
            request_id: self.request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            details,
        };

        (status, Json(error_response)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.with_request_id(Uuid::new_v4().to_string())
            .into_response()
    }
}
