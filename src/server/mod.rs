use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use handlers::{health_check, resolve_handler, tables_handler, unquote_handler};
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
};

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::graphql::QueriedTablesResolver;

pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub resolver: QueriedTablesResolver,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let resolver = QueriedTablesResolver::new(config.default_dialect);
        Self { config, resolver }
    }
}

/// Build the HTTP router for the given state
pub fn router(app_state: AppState) -> Router {
    let timeout = Duration::from_secs(app_state.config.request_timeout_secs);
    let max_body_bytes = app_state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/identifiers/unquote", post(unquote_handler))
        .route("/tables", post(tables_handler))
        .route("/resolve", post(resolve_handler))
        .with_state(Arc::new(app_state))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CatchPanicLayer::new())
}

pub async fn run_with_config(config: ServerConfig) {
    log::info!(
        "Server configuration: http={}:{}, dialect={}, overlay_prefix={}",
        config.http_host,
        config.http_port,
        config.default_dialect,
        config.overlay_prefix
    );

    let http_bind_address = format!("{}:{}", config.http_host, config.http_port);
    log::info!("Starting HTTP server on {}", http_bind_address);

    let app = router(AppState::new(config.clone()));

    let http_listener = match TcpListener::bind(&http_bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", http_bind_address);
            listener
        }
        Err(e) => {
            log::error!(
                "Failed to bind HTTP listener to {}: {}",
                http_bind_address,
                e
            );
            log::error!("  Is another process using port {}?", config.http_port);
            std::process::exit(1);
        }
    };

    let http_server = axum::serve(http_listener, app);

    println!("tableref server is running");
    println!("  HTTP API: http://{}", http_bind_address);

    if config.daemon {
        println!("Running in daemon mode - press Ctrl+C to stop");

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) =
                match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                    (Ok(term), Ok(int)) => (term, int),
                    (Err(e), _) | (_, Err(e)) => {
                        log::error!("Failed to register signal handlers: {}. Server will run without graceful shutdown.", e);
                        if let Err(e) = http_server.await {
                            log::error!("HTTP server error: {:?}", e);
                        }
                        return;
                    }
                };

            tokio::select! {
                result = http_server => {
                    if let Err(e) = result {
                        log::error!("HTTP server error: {:?}", e);
                    }
                }
                _ = sigterm.recv() => println!("Received SIGTERM, shutting down..."),
                _ = sigint.recv() => println!("Received SIGINT, shutting down..."),
            }
        }

        #[cfg(windows)]
        {
            tokio::select! {
                result = http_server => {
                    if let Err(e) = result {
                        log::error!("HTTP server error: {:?}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!("Received shutdown signal, shutting down...");
                }
            }
        }

        println!("Server stopped");
    } else if let Err(e) = http_server.await {
        log::error!("HTTP server fatal error: {:?}", e);
        std::process::exit(1);
    }
}
