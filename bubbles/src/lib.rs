//! Comment bubble placement, stacking, dragging and live sync for the host display.
//!
//! This crate owns the host-side model of one exhibit canvas: every guest
//! comment on the displayed photo becomes a bubble with a position (in
//! percent of the canvas) and a stacking order. The host UI layer is
//! responsible only for wiring pointer events to the [`host::HostView`] and
//! executing the returned [`drag::Action`]s; persistence and real-time
//! delivery go through the [`remote::RemoteStore`] collaborator.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`comment`] | Comment and position rows as stored and sent on the wire |
//! | [`placement`] | Deterministic hash-based initial placement and float animation |
//! | [`position`] | [`position::PositionStore`]: positions, clamping and stack order |
//! | [`drag`] | Pointer gesture state machine and host actions |
//! | [`remote`] | Remote collaborator trait, scoped subscriptions, errors |
//! | [`memory`] | In-process [`remote::RemoteStore`] implementation |
//! | [`retry`] | Bounded retry with backoff for best-effort writes |
//! | [`live`] | Live insert listener bound to one photo at a time |
//! | [`host`] | [`host::HostView`]: composition for one canvas with stale-load guard |
//! | [`consts`] | Shared numeric constants (safe band, hash salt, animation ranges) |

pub mod comment;
pub mod consts;
pub mod drag;
pub mod host;
pub mod live;
pub mod memory;
pub mod placement;
pub mod position;
pub mod remote;
pub mod retry;
