//! Verification oracle client
//!
//! The oracle is an external HTTP service that, given one email address and a
//! caller-supplied token, reports what the receiving mail server said about
//! it. [`VerificationOracle`] is the seam the cascade talks to; [`HttpOracle`]
//! is the production implementation built on reqwest.

use crate::FinderConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Raw oracle answer for a single email
///
/// Every field is optional and loosely typed: the oracle omits, nulls or
/// re-types fields freely, so a field of the wrong type reads as absent
/// instead of failing the whole answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mx: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub connections: Option<u64>,
}

/// Strings as-is, numbers and booleans as their text, anything else absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Non-negative integers, whole floats and numeric strings; anything else absent
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

impl OracleResponse {
    /// The message field, empty when absent
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Per-query oracle failures
///
/// These never reach the caller of the cascade: a failed query just moves on
/// to the next candidate. Transport errors carry no URL, since the query
/// string holds the caller's token.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Oracle response could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid oracle endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Something that can verify one email address
#[async_trait]
pub trait VerificationOracle: Send + Sync {
    async fn verify(&self, email: &str, token: &str) -> Result<OracleResponse, OracleError>;
}

/// HTTP oracle issuing `GET <endpoint>?email=..&token=..`
pub struct HttpOracle {
    client: Client,
    endpoint: Url,
}

impl HttpOracle {
    /// Create a new HTTP oracle client
    ///
    /// # Arguments
    /// * `endpoint` - Absolute http(s) URL of the verification endpoint
    /// * `timeout` - Per-request timeout enforced by the HTTP client
    /// * `user_agent` - User-Agent header value
    pub fn new(endpoint: &str, timeout: Duration, user_agent: &str) -> Result<Self, OracleError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| OracleError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(OracleError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        info!(
            "Oracle client initialized - endpoint: {}, timeout: {}ms",
            endpoint,
            timeout.as_millis()
        );

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &FinderConfig) -> Result<Self, OracleError> {
        Self::new(
            &config.oracle_url,
            Duration::from_millis(config.oracle_timeout_ms),
            &config.user_agent,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl VerificationOracle for HttpOracle {
    async fn verify(&self, email: &str, token: &str) -> Result<OracleResponse, OracleError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("email", email), ("token", token)])
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OracleError::Transport(e.without_url()))?;

        if !status.is_success() {
            // The body is still authoritative when it parses
            warn!("Oracle returned HTTP {} for a candidate", status);
        }

        let parsed: OracleResponse = serde_json::from_str(&body)?;
        debug!("Oracle answered '{}' for {}", parsed.message(), email);

        Ok(parsed)
    }
}
