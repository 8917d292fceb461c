//! Email Finder API Server
//!
//! Finds a person's deliverable corporate email address from their name and
//! company website, backed by an external verification oracle. Built with
//! axum and tokio.

use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use email_finder_core::EmailFinder;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod allow_list;
mod api_handler;
mod config;
mod middleware;
mod routes;

use allow_list::{ApiKeyStore, InMemoryKeyStore};
use config::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<EmailFinder>,
    pub key_store: Arc<dyn ApiKeyStore>,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = load_config()?;

    // Initialize tracing/logging
    init_tracing(&config)?;

    info!(
        "Starting {} v{}",
        config.observability.service_name,
        env!("CARGO_PKG_VERSION")
    );
    info!("Verification oracle: {}", config.oracle.base_url);

    // Initialize the finder
    let finder = EmailFinder::from_config(&config.oracle.to_finder_config())
        .map_err(|e| format!("Failed to initialize email finder: {}", e))?;

    let key_store = InMemoryKeyStore::new(config.security.api_keys.iter().cloned());
    if key_store.is_empty() {
        error!("No API keys configured; every /v1 request will be rejected");
    } else {
        info!("Loaded {} API keys", key_store.len());
    }

    // Create shared application state
    let app_state = AppState {
        finder: Arc::new(finder),
        key_store: Arc::new(key_store),
        config: Arc::new(config.clone()),
    };

    // Build the router
    let app = create_router(app_state);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("Health check available at http://{}/health", addr);
    info!("Search API: POST http://{}/v1/find", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let security = state.config.security.clone();
    let mut router = routes::build_routes(Arc::new(state));

    if security.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers(tower_http::cors::Any),
        );
    }

    router
        .layer(DefaultBodyLimit::max(security.max_body_size_bytes))
        .layer(axum_middleware::from_fn(middleware::security_headers))
        .layer(axum_middleware::from_fn(middleware::request_id))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
}

/// Initialize tracing and logging
fn init_tracing(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level = &config.observability.log_level;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{}={level},email_finder_core={level},tower_http={level}",
            env!("CARGO_PKG_NAME")
        )
        .into()
    });

    if config.observability.json_logs {
        // JSON format for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        // Human-readable format for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
