//! Client reconciler: keeps a local surface consistent with the authority.
//!
//! Every mutation entry point takes an [`Origin`]. `Remote` applies a change
//! that arrived from the network and never produces an outbound event;
//! `Local` applies (or observes) a change made on this participant and returns
//! the request to send. That parameter is the only echo-suppression
//! mechanism; surface objects carry no origin flag.
//!
//! Inbound events go through [`Reconciler::apply`]. Outbound requests are
//! returned to the caller, which owns the transport.

#[cfg(test)]
#[path = "reconciler_test.rs"]
mod reconciler_test;

use frames::{BoardId, ClientEvent, DrawableObject, ObjectId, ObjectPatch, ServerEvent};
use tracing::debug;

use crate::hit::Point;
use crate::ids::new_object_id;
use crate::mode::{Mode, ModeMachine};
use crate::surface::Surface;

/// Where a mutation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// User input on this participant. Emits a request.
    Local,
    /// An event received from the authority. Never emits.
    Remote,
}

/// Applies inbound events to a surface and turns local input into requests.
pub struct Reconciler<S> {
    surface: S,
    modes: ModeMachine,
    board_id: Option<BoardId>,
}

impl<S: Surface> Reconciler<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self { surface, modes: ModeMachine::new(), board_id: None }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    /// The board this participant last joined.
    #[must_use]
    pub fn board_id(&self) -> Option<&str> {
        self.board_id.as_deref()
    }

    /// Switch interaction mode. Local only; nothing is sent.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        self.modes.enter(mode, &mut self.surface)
    }

    // --- Session ---

    /// Start following `board_id`. The surface is emptied until the snapshot arrives.
    pub fn join(&mut self, board_id: impl Into<BoardId>) -> ClientEvent {
        let board_id = board_id.into();
        self.surface.clear();
        self.surface.request_render();
        self.board_id = Some(board_id.clone());
        ClientEvent::JoinBoard(board_id)
    }

    /// Ask the authority to clear the board. The surface is cleared when
    /// `board-cleared` comes back, not before.
    #[must_use]
    pub fn request_clear(&self) -> Option<ClientEvent> {
        self.board_id.clone().map(ClientEvent::ClearBoard)
    }

    // --- Inbound ---

    /// Apply one event from the authority.
    pub fn apply(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::InitState(snapshot) => {
                self.surface.clear();
                for object in snapshot.objects {
                    self.materialize(object);
                }
                self.surface.request_render();
            }
            ServerEvent::ObjectAdded(object) => {
                self.add_object(object, Origin::Remote);
            }
            ServerEvent::ObjectMoved(patch) => {
                self.update_object(&patch, Origin::Remote);
            }
            ServerEvent::ObjectRemoved(id) => {
                self.remove_object(&id, Origin::Remote);
            }
            ServerEvent::BoardCleared => {
                self.surface.clear();
                self.surface.request_render();
            }
        }
    }

    // --- Mutations ---

    /// Add an object. Local objects without an id get one.
    pub fn add_object(&mut self, mut object: DrawableObject, origin: Origin) -> Option<ClientEvent> {
        if object.id.is_empty() {
            object.id = new_object_id();
        }
        if self.surface.get(&object.id).is_some() {
            debug!(object_id = %object.id, ?origin, "add skipped: id already on surface");
            return None;
        }

        let outbound = match origin {
            Origin::Local => self.board_id.clone().map(|board_id| ClientEvent::DrawObject {
                board_id,
                object: object.clone(),
            }),
            Origin::Remote => None,
        };
        self.materialize(object);
        self.surface.request_render();
        outbound
    }

    /// Merge `patch` into the object it addresses and refresh its coordinates.
    pub fn update_object(&mut self, patch: &ObjectPatch, origin: Origin) -> Option<ClientEvent> {
        let Some(object) = self.surface.get_mut(&patch.id) else {
            debug!(object_id = %patch.id, ?origin, "update skipped: unknown object");
            return None;
        };
        if let Err(e) = patch.apply_to(object) {
            debug!(object_id = %patch.id, ?origin, error = %e, "update skipped: invalid patch");
            return None;
        }
        self.surface.set_coords(&patch.id);
        self.surface.request_render();

        match origin {
            Origin::Local => self.board_id.clone().map(|board_id| ClientEvent::MoveObject {
                board_id,
                object_data: patch.clone(),
            }),
            Origin::Remote => None,
        }
    }

    /// Observe a move, scale, or rotate the surface already applied from user
    /// input, and report the object's full state.
    #[must_use]
    pub fn object_modified(&mut self, id: &str) -> Option<ClientEvent> {
        let object = self.surface.get(id)?;
        let object_data = ObjectPatch::full(object);
        self.surface.set_coords(id);
        let board_id = self.board_id.clone()?;
        Some(ClientEvent::MoveObject { board_id, object_data })
    }

    /// Remove an object if present.
    pub fn remove_object(&mut self, id: &str, origin: Origin) -> Option<ClientEvent> {
        if self.surface.remove(id).is_none() {
            debug!(object_id = %id, ?origin, "remove skipped: unknown object");
            return None;
        }
        self.surface.request_render();

        match origin {
            Origin::Local => self.board_id.clone().map(|board_id| ClientEvent::RemoveObject {
                board_id,
                object_id: id.to_owned(),
            }),
            Origin::Remote => None,
        }
    }

    // --- Pointer ---

    /// Pointer pressed at `point`. Erases the path under it in erase mode.
    pub fn on_pointer_down(&mut self, point: Point) -> Vec<ClientEvent> {
        self.erase_at(point)
    }

    /// Pointer moved to `point`. Erases only while a button is held.
    pub fn on_pointer_move(&mut self, point: Point, button_held: bool) -> Vec<ClientEvent> {
        if !button_held {
            return Vec::new();
        }
        self.erase_at(point)
    }

    fn erase_at(&mut self, point: Point) -> Vec<ClientEvent> {
        if self.modes.mode() != Mode::Erase {
            return Vec::new();
        }
        let Some(id) = self.eraseable_at(point) else {
            return Vec::new();
        };
        self.remove_object(&id, Origin::Local).into_iter().collect()
    }

    fn eraseable_at(&self, point: Point) -> Option<ObjectId> {
        let id = self.surface.hit_test(point)?;
        let eraseable = self
            .surface
            .get(&id)
            .is_some_and(|o| o.kind().is_eraseable());
        eraseable.then_some(id)
    }

    /// Put an object on the surface with the current mode's selectability.
    fn materialize(&mut self, object: DrawableObject) {
        let selectable = self.modes.mode().allows_selection();
        self.surface.add(object, selectable);
    }
}
