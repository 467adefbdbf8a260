//! Client-side synchronization for the shared drawing board.
//!
//! This crate runs on each participant. It keeps the local rendering surface
//! consistent with the authoritative board: inbound events are applied without
//! being echoed back, local input becomes outbound requests, and the local
//! interaction mode decides what pointer input may do. The transport and the
//! actual drawing engine live outside; the engine is reached through the
//! [`surface::Surface`] trait.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`reconciler`] | Inbound apply, outbound requests, eraser input |
//! | [`mode`] | Select / Draw / Erase state machine |
//! | [`surface`] | Rendering-surface trait and the headless [`surface::Scene`] |
//! | [`hit`] | Points, bounds, and object hit-testing |
//! | [`ids`] | Object ids, board codes, and deep links |
//! | [`consts`] | Shared numeric constants |

pub mod consts;
pub mod hit;
pub mod ids;
pub mod mode;
pub mod reconciler;
pub mod surface;
