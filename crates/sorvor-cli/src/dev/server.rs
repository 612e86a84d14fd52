//! Development HTTP server.
//!
//! Two kinds of routes share one listener: the live-reload stream and the
//! static output directory.

use crate::dev::static_files;
use crate::error::{CliError, Result};
use axum::extract::FromRef;
use axum::Router;
use sorvor_livereload::{endpoint, Broadcaster};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// State shared by all request handlers.
#[derive(Clone)]
pub struct DevState {
    pub broadcaster: Broadcaster,
    pub out_dir: Arc<PathBuf>,
}

impl DevState {
    pub fn new(broadcaster: Broadcaster, out_dir: PathBuf) -> Self {
        Self {
            broadcaster,
            out_dir: Arc::new(out_dir),
        }
    }
}

impl FromRef<DevState> for Broadcaster {
    fn from_ref(state: &DevState) -> Self {
        state.broadcaster.clone()
    }
}

impl FromRef<DevState> for Arc<PathBuf> {
    fn from_ref(state: &DevState) -> Self {
        state.out_dir.clone()
    }
}

/// Build the router: `GET /livereload` plus the static fallback, with
/// permissive CORS.
pub fn router(state: DevState) -> Router {
    Router::new()
        .merge(endpoint::router::<DevState>())
        .fallback(static_files::serve_file)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve until `shutdown` resolves, then finish in-flight requests.
pub async fn serve<F>(listener: TcpListener, state: DevState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| CliError::Server(format!("Listener has no address: {}", e)))?;
    tracing::debug!(%addr, "dev server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| CliError::Server(format!("Server error on {}: {}", addr, e)))
}
