//! Session membership: which connection follows which board.
//!
//! DESIGN
//! ======
//! Two maps kept in lockstep: connection → board, and board → the outbound
//! senders of its members. A connection follows at most one board; joining
//! another replaces the first. Leaving never touches the board itself.
//!
//! Broadcast is best-effort. A member whose outbound queue is full or closed
//! misses that event; it is never allowed to stall the sender.

use std::collections::HashMap;

use frames::{BoardId, ServerEvent};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;
use uuid::Uuid;

#[cfg(test)]
#[path = "membership_test.rs"]
mod tests;

/// Identifies one live transport connection.
pub type ConnId = Uuid;

#[derive(Debug, Default)]
pub struct Membership {
    board_of: HashMap<ConnId, BoardId>,
    members: HashMap<BoardId, HashMap<ConnId, mpsc::Sender<ServerEvent>>>,
}

impl Membership {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `conn` as a member of `board_id`. Returns the board it left, if any.
    pub fn join(&mut self, conn: ConnId, board_id: &str, tx: mpsc::Sender<ServerEvent>) -> Option<BoardId> {
        let previous = self.leave(conn);
        self.board_of.insert(conn, board_id.to_owned());
        self.members.entry(board_id.to_owned()).or_default().insert(conn, tx);
        previous
    }

    /// Drop `conn` from whatever board it follows. Returns that board.
    pub fn leave(&mut self, conn: ConnId) -> Option<BoardId> {
        let board_id = self.board_of.remove(&conn)?;
        if let Some(group) = self.members.get_mut(&board_id) {
            group.remove(&conn);
            if group.is_empty() {
                self.members.remove(&board_id);
            }
        }
        Some(board_id)
    }

    #[must_use]
    pub fn board_of(&self, conn: ConnId) -> Option<&str> {
        self.board_of.get(&conn).map(String::as_str)
    }

    #[must_use]
    pub fn member_count(&self, board_id: &str) -> usize {
        self.members.get(board_id).map_or(0, HashMap::len)
    }

    /// Queue `event` for every member of `board_id` except `exclude`.
    /// Returns how many members it was queued for.
    pub fn broadcast(&self, board_id: &str, event: &ServerEvent, exclude: Option<ConnId>) -> usize {
        let Some(group) = self.members.get(board_id) else {
            return 0;
        };

        let mut delivered = 0;
        for (conn_id, tx) in group {
            if exclude == Some(*conn_id) {
                continue;
            }
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!(%conn_id, %board_id, event = event.name(), "broadcast dropped: outbound queue full");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(%conn_id, %board_id, event = event.name(), "broadcast dropped: connection closing");
                }
            }
        }
        delivered
    }
}
