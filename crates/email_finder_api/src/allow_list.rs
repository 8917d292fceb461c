//! API key allow-list for the search endpoints
//!
//! Every `/v1/*` request must carry a key from the allow-list in the
//! configured header (`x-api-key` by default). Keys are looked up through
//! [`ApiKeyStore`] so deployments can back the list with something other
//! than static configuration.

use crate::{
    api_handler::{ApiError, ApiFailure},
    middleware::extract_or_generate_request_id,
    AppState,
};
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Source of allow-listed API keys
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Whether `key` is allowed to call the API
    async fn contains(&self, key: &str) -> anyhow::Result<bool>;

    /// Whether the store can currently authorize anyone
    async fn is_ready(&self) -> bool {
        true
    }
}

/// Allow-list held in memory, loaded from configuration
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyStore {
    keys: HashSet<String>,
}

impl InMemoryKeyStore {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = keys
            .into_iter()
            .map(Into::into)
            .filter(|key: &String| !key.trim().is_empty())
            .collect();
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl ApiKeyStore for InMemoryKeyStore {
    async fn contains(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.keys.contains(key))
    }

    async fn is_ready(&self) -> bool {
        !self.is_empty()
    }
}

/// Allow-list middleware for protected routes
///
/// Rejects the request with 401 when the key header is missing, the key is
/// unknown, or the store cannot be consulted.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiFailure> {
    let request_id = extract_or_generate_request_id(request.headers());
    let header = state.config.security.api_key_header.as_str();

    let key = request
        .headers()
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            debug!("Missing {} header", header);
            ApiError::Unauthorized(format!("Missing {} header", header))
                .with_request_id(request_id.clone())
        })?;

    match state.key_store.contains(&key).await {
        Ok(true) => {
            debug!("API key accepted");
            Ok(next.run(request).await)
        }
        Ok(false) => {
            warn!("Rejected request with unknown API key");
            Err(ApiError::Unauthorized("Invalid API key".to_string()).with_request_id(request_id))
        }
        Err(e) => {
            error!("API key store lookup failed: {}", e);
            Err(ApiError::Unauthorized("API key could not be verified".to_string())
                .with_request_id(request_id))
        }
    }
}
