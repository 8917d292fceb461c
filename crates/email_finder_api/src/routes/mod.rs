//! API Routes Module
//!
//! This module organizes all HTTP endpoints into logical groups:
//! - `find`: API-key protected email search
//! - `health`: Liveness and readiness probes

pub mod find;
pub mod health;

use crate::{allow_list::require_api_key, AppState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build all API routes and return a configured Router
///
/// Search endpoints sit behind the API key allow-list; health endpoints
/// stay public.
pub fn build_routes(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/v1/find", post(find::find_email_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .merge(protected)
        // Health and monitoring endpoints
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::ready_handler))
        // Apply shared state to all routes
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::{
        allow_list::{ApiKeyStore, InMemoryKeyStore},
        config::AppConfig,
        create_router, AppState,
    };
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use email_finder_core::{EmailFinder, OracleError, OracleResponse, VerificationOracle};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const API_KEY: &str = "test-key";

    /// Oracle accepting a single address and rejecting the rest
    struct SingleMailboxOracle {
        mailbox: Option<&'static str>,
    }

    #[async_trait]
    impl VerificationOracle for SingleMailboxOracle {
        async fn verify(&self, email: &str, _token: &str) -> Result<OracleResponse, OracleError> {
            let Some(mailbox) = self.mailbox else {
                return Err(OracleError::InvalidEndpoint("oracle offline".to_string()));
            };
            let (message, code) = if email == mailbox {
                ("Accepted", "ok")
            } else {
                ("Rejected", "ko")
            };
            Ok(OracleResponse {
                message: Some(message.to_string()),
                code: Some(code.to_string()),
                email: Some(email.to_string()),
                user: email.split('@').next().map(str::to_string),
                domain: email.split('@').nth(1).map(str::to_string),
                mx: Some("mx.example.com".to_string()),
                connections: Some(1),
            })
        }
    }

    fn app_with(mailbox: Option<&'static str>, key_store: Arc<dyn ApiKeyStore>) -> Router {
        let mut config = AppConfig::default();
        config.security.api_keys = vec![API_KEY.to_string()];

        let state = AppState {
            finder: Arc::new(EmailFinder::new(Arc::new(SingleMailboxOracle { mailbox }))),
            key_store,
            config: Arc::new(config),
        };
        create_router(state)
    }

    fn app(mailbox: Option<&'static str>) -> Router {
        app_with(mailbox, Arc::new(InMemoryKeyStore::new([API_KEY])))
    }

    fn find_request(body: Value, api_key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/v1/find")
            .header("content-type", "application/json");
        if let Some(key) = api_key {
            builder = builder.header("x-api-key", key);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn john_smith() -> Value {
        json!({
            "full_name": "John Smith",
            "company_website": "https://www.example.com/team",
            "token": "oracle-token"
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = app(None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert!(response.headers().contains_key("x-request-id"));

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_depends_on_api_keys() {
        let response = app(None)
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["ready"], true);

        let response = app_with(None, Arc::new(InMemoryKeyStore::default()))
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["ready"], false);
        assert_eq!(body["api_keys_configured"], false);
    }

    #[tokio::test]
    async fn test_find_requires_api_key() {
        let response = app(Some("jsmith@example.com"))
            .oneshot(find_request(john_smith(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error_code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_find_rejects_unknown_api_key() {
        let response = app(Some("jsmith@example.com"))
            .oneshot(find_request(john_smith(), Some("wrong-key")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_find_returns_single_result_array() {
        let response = app(Some("jsmith@example.com"))
            .oneshot(find_request(john_smith(), Some(API_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert_eq!(result["email"], "jsmith@example.com");
        assert_eq!(result["status"], "valid");
        assert_eq!(result["message"], "deliverable");
        assert_eq!(result["user_name"], "jsmith");
        assert_eq!(result["ver_ops"], 3);
        assert!(result["time_exec"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_find_all_rejected_is_still_ok() {
        let response = app(Some("nobody@elsewhere.com"))
            .oneshot(find_request(john_smith(), Some(API_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body[0]["email"], "");
        assert_eq!(body[0]["message"], "Rejected");
        assert_eq!(body[0]["status"], "not_found");
    }

    #[tokio::test]
    async fn test_missing_token_echoes_request_id() {
        let mut request = find_request(
            json!({ "full_name": "John Smith", "company_website": "example.com" }),
            Some(API_KEY),
        );
        request
            .headers_mut()
            .insert("x-request-id", "req-42".parse().unwrap());

        let response = app(Some("jsmith@example.com")).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["x-request-id"], "req-42");

        let body = json_body(response).await;
        assert_eq!(body["error_code"], "INVALID_INPUT");
        assert_eq!(body["request_id"], "req-42");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/find")
            .header("content-type", "application/json")
            .header("x-api-key", API_KEY)
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error_code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_oversized_body() {
        let body = json!({
            "full_name": "x".repeat(8 * 1024),
            "company_website": "example.com",
            "token": "t"
        });

        let response = app(None)
            .oneshot(find_request(body, Some(API_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let body = json!({
            "full_name": "John Smith",
            "company_website": "example.123",
            "token": "t"
        });

        let response = app(Some("jsmith@example.com"))
            .oneshot(find_request(body, Some(API_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error_code"], "NO_CANDIDATES");
    }

    #[tokio::test]
    async fn test_oracle_offline_is_bad_gateway() {
        let response = app(None)
            .oneshot(find_request(john_smith(), Some(API_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = json_body(response).await;
        assert_eq!(body["error_code"], "VERIFICATION_FAILED");
        assert_eq!(body["details"]["ver_ops"], "25");
    }
}
