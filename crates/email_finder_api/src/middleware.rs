//! Middleware for request correlation and response hardening
//!
//! This module contains middleware functions applied to every route:
//! request id propagation and security headers.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID middleware
///
/// Makes sure every request carries an `x-request-id` header (reusing the
/// caller's trace or request id when present) and echoes it on the response.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let request_id = extract_or_generate_request_id(request.headers());
    let header_value = HeaderValue::from_str(&request_id).ok();

    debug!("Processing request: {}", request_id);

    if let Some(value) = &header_value {
        request
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value.clone());
    }

    let mut response = next.run(request).await;

    if response.status().is_client_error() {
        warn!("Client error for request {}: {}", request_id, response.status());
    }

    if let Some(value) = header_value {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

/// Request ID extraction and generation
///
/// Extracts request ID from headers or generates a new one.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> String {
    for name in ["x-trace-id", REQUEST_ID_HEADER] {
        if let Some(id) = headers.get(name).and_then(|value| value.to_str().ok()) {
            if !id.trim().is_empty() {
                return id.to_string();
            }
        }
    }

    Uuid::new_v4().to_string()
}

/// Security headers middleware
///
/// Adds security-related headers to all responses.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert("cache-control", HeaderValue::from_static("no-store"));

    headers.insert("x-api-version", HeaderValue::from_static(env!("CARGO_PKG_VERSION")));

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_or_generate_request_id() {
        let mut headers = HeaderMap::new();

        headers.insert("x-trace-id", HeaderValue::from_static("trace-123"));
        assert_eq!(extract_or_generate_request_id(&headers), "trace-123");

        headers.clear();
        headers.insert("x-request-id", HeaderValue::from_static("req-456"));
        assert_eq!(extract_or_generate_request_id(&headers), "req-456");

        // Blank ids are replaced
        headers.clear();
        headers.insert("x-request-id", HeaderValue::from_static("  "));
        let generated_id = extract_or_generate_request_id(&headers);
        assert!(Uuid::parse_str(&generated_id).is_ok());

        headers.clear();
        let generated_id = extract_or_generate_request_id(&headers);
        assert!(!generated_id.is_empty());
        assert!(Uuid::parse_str(&generated_id).is_ok());
    }
}
