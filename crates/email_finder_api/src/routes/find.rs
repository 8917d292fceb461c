//! Email search route handler
//!
//! Accepts a person's name and company website and runs the full search:
//! candidate generation followed by the verification cascade.

use crate::{
    api_handler::*,
    middleware::extract_or_generate_request_id,
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use email_finder_core::FindRequest;
use std::sync::Arc;
use tracing::{info, instrument, warn, Span};

/// POST /v1/find
///
/// Body: `{"full_name": "...", "company_website": "...", "token": "..."}`
///
/// Returns a one-element array holding the normalized verification result.
/// A rejected search is still a 200: its `email` is empty and `message`
/// carries the oracle's verdict.
#[instrument(skip_all, fields(request_id))]
pub async fn find_email_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<FindEmailRequest>, JsonRejection>,
) -> ApiResult<FindEmailResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    Span::current().record("request_id", request_id.as_str());

    // Step 1: Body parsing
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        let error = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::RequestTooLarge,
            _ => ApiError::InvalidInput(rejection.body_text()),
        };
        error.with_request_id(request_id.clone())
    })?;

    info!("Searching email for company website '{}'", payload.company_website);

    // Step 2: Search
    let request = FindRequest::from(payload);
    let result = state
        .finder
        .find(&request)
        .await
        .map_err(|e| {
            warn!("Search failed: {}", e);
            ApiError::from(e).with_request_id(request_id.clone())
        })?;

    info!(
        "Search finished: email='{}', message='{}', ver_ops={}",
        result.email, result.message, result.ver_ops
    );

    Ok(Json(vec![result]))
}
