//! Shared board model and event codec for realtime WS transport.
//!
//! This crate owns the wire representation used by both the server and the
//! canvas clients. Objects are a closed set of kinds with a shared transform;
//! events travel as JSON text or, for compact transport, as JSON payloads
//! wrapped in a protobuf envelope.
//!
//! | Module | Role |
//! |--------|------|
//! | [`object`] | Drawable objects, kinds, and transforms |
//! | [`patch`] | Field-level partial updates and their validation |
//! | [`event`] | Client-to-server and server-to-client events |
//! | [`codec`] | JSON and protobuf encodings of events |

pub mod codec;
pub mod event;
pub mod object;
pub mod patch;

pub use codec::{CodecError, Encoding};
pub use event::{ClientEvent, ServerEvent, Snapshot};
pub use object::{
    BoardId, DrawableObject, ObjectBody, ObjectId, ObjectKind, PathBody, ShapeBody, ShapeKind, TextBody, Transform,
};
pub use patch::{ObjectPatch, PartialTransform, PatchError};
