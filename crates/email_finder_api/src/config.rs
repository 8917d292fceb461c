//! Configuration management for the email finder API
//!
//! Defaults are overridden by an optional `Config.toml` and then by
//! environment variables prefixed with `EMAIL_FINDER_`, using `__` between
//! nesting levels (e.g. `EMAIL_FINDER_SERVER__PORT=8080`).

use email_finder_core::FinderConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "EMAIL_FINDER_";
pub const CONFIG_FILE: &str = "Config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub oracle: OracleConfig,
    pub observability: ObservabilityConfig,
    pub security: SecurityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Verification oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Verification endpoint, queried as `GET <base_url>?email=..&token=..`
    pub base_url: String,
    /// Per-query timeout in milliseconds
    pub timeout_ms: u64,
    /// User-Agent header sent to the oracle
    pub user_agent: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        let core = FinderConfig::default();
        Self {
            base_url: core.oracle_url,
            timeout_ms: core.oracle_timeout_ms,
            user_agent: core.user_agent,
        }
    }
}

impl OracleConfig {
    pub fn to_finder_config(&self) -> FinderConfig {
        FinderConfig {
            oracle_url: self.base_url.clone(),
            oracle_timeout_ms: self.timeout_ms,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Enable JSON structured logging
    pub json_logs: bool,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Service name reported in startup logs
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            log_level: "info".to_string(),
            service_name: "email-finder-api".to_string(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Header carrying the caller's API key
    pub api_key_header: String,
    /// Allow-listed API keys
    pub api_keys: Vec<String>,
    /// Maximum request body size in bytes
    pub max_body_size_bytes: usize,
    /// Enable permissive CORS
    pub enable_cors: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            api_key_header: "x-api-key".to_string(),
            api_keys: Vec::new(), // Nothing is authorized until keys are configured
            max_body_size_bytes: 4096,
            enable_cors: true,
        }
    }
}

/// Load configuration from defaults, `Config.toml` and the environment
pub fn load_config() -> Result<AppConfig, figment::Error> {
    build_figment(Path::new(CONFIG_FILE)).extract()
}

fn build_figment(config_file: &Path) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if config_file.exists() {
        figment = figment.merge(Toml::file(config_file));
    }

    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}
