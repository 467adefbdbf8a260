//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the room store and the membership registry, each behind its own
//! `RwLock`. When both are needed, `rooms` is locked first.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::services::membership::Membership;
use crate::services::room::RoomStore;

/// Shared application state. Clone is required by Axum; every field is
/// Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<RoomStore>>,
    pub members: Arc<RwLock<Membership>>,
    pub config: Config,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(RoomStore::new())),
            members: Arc::new(RwLock::new(Membership::new())),
            config,
        }
    }
}
