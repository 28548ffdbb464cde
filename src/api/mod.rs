//! REST API over the profile store.
//!
//! - `GET /profiles`: reference year, default operator, and known operators
//! - `GET /profiles/curve`: daily weight curve of one profile
//! - `POST /estimate`: run one estimation request

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::config::EstimationConfig;
use crate::profile::ProfileStore;

pub use types::{CurvePoint, CurveQuery, CurveResponse, ErrorResponse, ProfilesResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once at startup and wrapped in `Arc`; no locks needed since the
/// profile store is never written after loading.
pub struct AppState {
    pub store: ProfileStore,
    pub estimation: EstimationConfig,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/profiles", get(handlers::get_profiles))
        .route("/profiles/curve", get(handlers::get_curve))
        .route("/estimate", post(handlers::post_estimate))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
