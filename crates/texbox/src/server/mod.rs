//! HTTP front end
//!
//! Every POST is one compilation: the path names the engine, the body carries
//! the source, and the response carries the document or a JSON error envelope.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use crate::server::handlers::{CompileRequest, compile_document};
pub use crate::server::response::{ApiError, Envelope, EnvelopeStatus};

mod handlers;
mod response;

use crate::config::{Config, ConfigError};
use crate::runner::Runner;

/// Errors that stop the server from running
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid server configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Shared state for request handlers
#[derive(Debug)]
pub struct AppState {
    pub runner: Runner,
}

/// Build the router
///
/// POST to `/` uses the default compiler; POST to `/<compiler>` selects one.
/// Other methods get 405.
pub fn router(config: Config) -> Router {
    let state = Arc::new(AppState {
        runner: Runner::new(config),
    });

    Router::new()
        .route("/", post(compile_document))
        .route("/{*compiler}", post(compile_document))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM
///
/// In-flight compilations are allowed to finish before returning.
pub async fn serve(config: Config) -> Result<(), ServerError> {
    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(
        %addr,
        default_compiler = %config.default_compiler,
        timeout = config.compile_timeout,
        "HTTP server listening"
    );

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("received shutdown signal, finishing in-flight requests");
}
