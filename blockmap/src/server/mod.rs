//! HTTP server for the map viewer.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | viewer page |
//! | `GET /index.js` | viewer script |
//! | `GET /tile?x=&y=&world=` | PNG tile, rendered on a cache miss |
//! | `GET /config/<path>` | JSON value from the configuration tree |
//! | `GET /config/` | the whole configuration tree |
//! | `GET /worlds` | JSON array of world names |

mod handlers;
mod state;

pub use handlers::{TileError, TileQuery, RENDERED_TILE_MAX_AGE_SECS};
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// Errors from running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/index.js", get(handlers::script))
        .route("/tile", get(handlers::tile))
        .route("/config/", get(handlers::config_root))
        .route("/config/*key", get(handlers::config_value))
        .route("/worlds", get(handlers::worlds))
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: Arc<AppState>, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    serve_listener(listener, state, shutdown).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_listener<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(local) = listener.local_addr() {
        info!(addr = %local, worlds = state.registry.len(), "Server is running");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    info!("Server stopped");
    Ok(())
}
