//! Authoritative board server for the shared drawing surface.
//!
//! | Module | Role |
//! |--------|------|
//! | [`services::room`] | Per-board object store |
//! | [`services::membership`] | Connection ↔ board membership and broadcast |
//! | [`routes::ws`] | WebSocket transport and event routing |
//! | [`routes::boards`] | Read-only snapshot endpoint |
//! | [`config`] | Environment configuration |
//! | [`state`] | Shared handler state |

pub mod config;
pub mod routes;
pub mod services;
pub mod state;
