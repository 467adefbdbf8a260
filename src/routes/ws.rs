//! WebSocket handler: board event relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a connection ID and enters a `select!` loop:
//! - Incoming client events → decode + dispatch by event name
//! - Broadcast events from board peers → encode + forward to client
//!
//! Handler functions are pure business logic over the room store. They
//! validate, mutate, and return an `Outcome`. The dispatch layer owns all
//! outbound concerns: reply to sender and broadcast to peers. The store
//! write lock is held until the broadcast is queued, so every member sees a
//! board's events in the order the store applied them.
//!
//! Bad input (undecodable frames, unknown events, patches that do not fit
//! the stored object) is logged and dropped. Nothing is sent back and the
//! connection stays open.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → connection ID assigned, no greeting
//! 2. Client sends `join-board` → fresh outbox, unicast `init-state` snapshot
//! 3. Mutations → Outcome → broadcast to the board's members
//! 4. Close → membership removed; the board and its objects remain

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use frames::codec::{decode_binary, decode_text, encode_binary, encode_text};
use frames::{BoardId, ClientEvent, CodecError, DrawableObject, Encoding, ObjectId, ObjectPatch, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::membership::ConnId;
use crate::services::room::RoomStore;
use crate::state::AppState;

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result returned by handler functions. The dispatch layer uses this to
/// decide who receives what. Handlers never send events directly.
#[derive(Debug, PartialEq)]
enum Outcome {
    /// Send to the requester only.
    Reply(ServerEvent),
    /// Send to every member of the board except the requester.
    BroadcastExcludeSender { board_id: BoardId, event: ServerEvent },
    /// Send to every member of the board, requester included.
    Broadcast { board_id: BoardId, event: ServerEvent },
    /// The request had no effect. Nobody hears about it.
    Ignore,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

/// Queue of events broadcast to this connection by board peers.
///
/// Replaced on every join: events still queued for the previous board are
/// dropped with the old receiver and never reach the new board's view.
struct Outbox {
    rx: mpsc::Receiver<ServerEvent>,
    capacity: usize,
}

impl Outbox {
    fn new(capacity: usize) -> Self {
        let (_, rx) = mpsc::channel(capacity);
        Self { rx, capacity }
    }

    /// Start a fresh queue and return its sender for membership.
    fn renew(&mut self) -> mpsc::Sender<ServerEvent> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.rx = rx;
        tx
    }
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    let mut outbox = Outbox::new(state.config.ws_channel_capacity);

    // Replies follow the encoding of the client's most recent message.
    let mut encoding = Encoding::default();

    info!(%conn_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                let Some((msg_encoding, decoded)) = decode_message(&msg) else {
                    if matches!(msg, Message::Close(_)) {
                        break;
                    }
                    continue;
                };
                encoding = msg_encoding;
                let replies = process_inbound(&state, conn_id, &mut outbox, decoded).await;
                if send_events(&mut socket, encoding, &replies).await.is_err() {
                    break;
                }
            }
            Some(event) = outbox.rx.recv() => {
                if send_event(&mut socket, encoding, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    let left = state.members.write().await.leave(conn_id);
    info!(%conn_id, board_id = left.as_deref().unwrap_or("-"), "ws: client disconnected");
}

/// Decode a data message. `None` for control frames.
fn decode_message(msg: &Message) -> Option<(Encoding, Result<ClientEvent, CodecError>)> {
    match msg {
        Message::Text(text) => Some((Encoding::Json, decode_text(text.as_str()))),
        Message::Binary(bytes) => Some((Encoding::Protobuf, decode_binary(bytes))),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) => None,
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Process one decoded inbound event and return events for the sender.
///
/// Broadcasts are queued on peers' outboxes (and on the sender's own when it
/// is part of the audience) before the store lock is released.
async fn process_inbound(
    state: &AppState,
    conn_id: ConnId,
    outbox: &mut Outbox,
    decoded: Result<ClientEvent, CodecError>,
) -> Vec<ServerEvent> {
    let event = match decoded {
        Ok(event) => event,
        Err(e) => {
            warn!(%conn_id, error = %e, "ws: dropped malformed inbound event");
            return Vec::new();
        }
    };
    let name = event.name();
    debug!(%conn_id, event = name, board_id = %event.board_id(), "ws: recv event");

    let mut rooms = state.rooms.write().await;

    let outcome = match event {
        ClientEvent::JoinBoard(board_id) => {
            let outcome = handle_join(&mut rooms, &board_id);
            if matches!(outcome, Outcome::Reply(_)) {
                let previous = state.members.write().await.join(conn_id, &board_id, outbox.renew());
                info!(%conn_id, %board_id, previous = previous.as_deref().unwrap_or("-"), "ws: joined board");
            }
            outcome
        }
        ClientEvent::DrawObject { board_id, object } => handle_draw(&mut rooms, board_id, object),
        ClientEvent::MoveObject { board_id, object_data } => handle_move(&mut rooms, board_id, object_data),
        ClientEvent::RemoveObject { board_id, object_id } => handle_remove(&mut rooms, board_id, object_id),
        ClientEvent::ClearBoard(board_id) => handle_clear(&mut rooms, board_id),
    };

    let replies = match outcome {
        Outcome::Reply(event) => vec![event],
        Outcome::BroadcastExcludeSender { board_id, event } => {
            let peers = state.members.read().await.broadcast(&board_id, &event, Some(conn_id));
            debug!(%conn_id, %board_id, event = event.name(), peers, "ws: broadcast");
            Vec::new()
        }
        Outcome::Broadcast { board_id, event } => {
            let peers = state.members.read().await.broadcast(&board_id, &event, None);
            debug!(%conn_id, %board_id, event = event.name(), peers, "ws: broadcast to all");
            Vec::new()
        }
        Outcome::Ignore => {
            debug!(%conn_id, event = name, "ws: request had no effect");
            Vec::new()
        }
    };
    drop(rooms);
    replies
}

// =============================================================================
// HANDLERS
// =============================================================================

fn handle_join(rooms: &mut RoomStore, board_id: &str) -> Outcome {
    if board_id.is_empty() {
        warn!("ws: join-board with empty board id");
        return Outcome::Ignore;
    }
    Outcome::Reply(ServerEvent::InitState(rooms.ensure(board_id).snapshot()))
}

fn handle_draw(rooms: &mut RoomStore, board_id: BoardId, object: DrawableObject) -> Outcome {
    if object.id.is_empty() {
        warn!(%board_id, "ws: draw-object without an object id");
        return Outcome::Ignore;
    }
    if !rooms.add(&board_id, object.clone()) {
        debug!(%board_id, object_id = %object.id, "ws: draw-object skipped (unknown board or duplicate id)");
        return Outcome::Ignore;
    }
    Outcome::BroadcastExcludeSender { board_id, event: ServerEvent::ObjectAdded(object) }
}

fn handle_move(rooms: &mut RoomStore, board_id: BoardId, patch: ObjectPatch) -> Outcome {
    match rooms.update(&board_id, &patch) {
        Ok(true) => Outcome::BroadcastExcludeSender { board_id, event: ServerEvent::ObjectMoved(patch) },
        Ok(false) => {
            debug!(%board_id, object_id = %patch.id, "ws: move-object skipped (unknown board or object)");
            Outcome::Ignore
        }
        Err(e) => {
            warn!(%board_id, object_id = %patch.id, error = %e, "ws: move-object rejected");
            Outcome::Ignore
        }
    }
}

fn handle_remove(rooms: &mut RoomStore, board_id: BoardId, object_id: ObjectId) -> Outcome {
    if !rooms.remove(&board_id, &object_id) {
        debug!(%board_id, %object_id, "ws: remove-object skipped (unknown board or object)");
        return Outcome::Ignore;
    }
    Outcome::BroadcastExcludeSender { board_id, event: ServerEvent::ObjectRemoved(object_id) }
}

fn handle_clear(rooms: &mut RoomStore, board_id: BoardId) -> Outcome {
    if !rooms.clear(&board_id) {
        debug!(%board_id, "ws: clear-board skipped (unknown board)");
        return Outcome::Ignore;
    }
    Outcome::Broadcast { board_id, event: ServerEvent::BoardCleared }
}

// =============================================================================
// HELPERS
// =============================================================================

fn encode_message(encoding: Encoding, event: &ServerEvent) -> Result<Message, CodecError> {
    Ok(match encoding {
        Encoding::Json => Message::Text(encode_text(event)?.into()),
        Encoding::Protobuf => Message::Binary(encode_binary(event)?.into()),
    })
}

async fn send_event(
    socket: &mut WebSocket,
    encoding: Encoding,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let msg = match encode_message(encoding, event) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(event = event.name(), error = %e, "ws: failed to encode event");
            return Ok(());
        }
    };
    debug!(event = event.name(), ?encoding, "ws: send event");
    socket.send(msg).await
}

async fn send_events(
    socket: &mut WebSocket,
    encoding: Encoding,
    events: &[ServerEvent],
) -> Result<(), axum::Error> {
    for event in events {
        send_event(socket, encoding, event).await?;
    }
    Ok(())
}
