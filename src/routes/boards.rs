//! Board snapshot endpoint.
//!
//! Read-only. Looking at a board never creates it; only `join-board` does.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use frames::Snapshot;

use crate::state::AppState;

#[cfg(test)]
#[path = "boards_test.rs"]
mod tests;

/// `GET /api/boards/{board_id}`: current contents, or 404 for a board nobody joined.
pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> Result<Json<Snapshot>, StatusCode> {
    state
        .rooms
        .read()
        .await
        .snapshot(&board_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
