//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the realtime WebSocket endpoint, a read-only
//! board snapshot for diagnostics, and a health probe. CORS is open to any
//! origin since participants load the drawing client from anywhere.

pub mod boards;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;


/// Full application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/api/boards/{board_id}", get(boards::get_board))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
