//! Board events exchanged between participants and the authority.
//!
//! Events are adjacently tagged: `{"event": "draw-object", "data": {...}}`.
//! Payload field names are camelCase on the wire (`boardId`, `objectData`,
//! `objectId`). `board-cleared` carries no `data`.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use serde::{Deserialize, Serialize};

use crate::object::{BoardId, DrawableObject, ObjectId};
use crate::patch::ObjectPatch;

/// Full board contents sent to a joining participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub objects: Vec<DrawableObject>,
}

/// Requests sent from a participant to the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Subscribe to a board, creating it if needed.
    JoinBoard(BoardId),
    /// Create an object unless its id already exists.
    DrawObject { board_id: BoardId, object: DrawableObject },
    /// Merge-update an existing object.
    MoveObject { board_id: BoardId, object_data: ObjectPatch },
    /// Delete an object by id.
    RemoveObject { board_id: BoardId, object_id: ObjectId },
    /// Empty the board.
    ClearBoard(BoardId),
}

impl ClientEvent {
    /// Wire name of the event, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinBoard(_) => "join-board",
            Self::DrawObject { .. } => "draw-object",
            Self::MoveObject { .. } => "move-object",
            Self::RemoveObject { .. } => "remove-object",
            Self::ClearBoard(_) => "clear-board",
        }
    }

    /// The board this event addresses.
    #[must_use]
    pub fn board_id(&self) -> &str {
        match self {
            Self::JoinBoard(board_id)
            | Self::ClearBoard(board_id)
            | Self::DrawObject { board_id, .. }
            | Self::MoveObject { board_id, .. }
            | Self::RemoveObject { board_id, .. } => board_id,
        }
    }
}

/// Notifications sent from the authority to participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Unicast to a joiner.
    InitState(Snapshot),
    /// Room minus sender.
    ObjectAdded(DrawableObject),
    /// Room minus sender.
    ObjectMoved(ObjectPatch),
    /// Room minus sender.
    ObjectRemoved(ObjectId),
    /// Entire room, sender included.
    BoardCleared,
}

impl ServerEvent {
    /// Wire name of the event, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitState(_) => "init-state",
            Self::ObjectAdded(_) => "object-added",
            Self::ObjectMoved(_) => "object-moved",
            Self::ObjectRemoved(_) => "object-removed",
            Self::BoardCleared => "board-cleared",
        }
    }
}
