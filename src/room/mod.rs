//! Room hosting: one async actor per room plus a directory on top.
//!
//! Each room runs in its own Tokio task with an mpsc inbox. The actor is
//! the room's only writer, so player actions and the phase timer never
//! interleave mid-transition. [`RoomDirectory`] maps room names and user
//! memberships onto actor handles and enforces the room-level invariants
//! (unique names, capacity, one room per user, delete-on-empty).

pub mod actor;
pub mod config;
pub mod directory;
pub mod errors;
pub mod messages;

pub use actor::{RoomActor, RoomHandle};
pub use config::RoomConfig;
pub use directory::RoomDirectory;
pub use errors::RoomError;
pub use messages::{LeaveReply, RoomMessage};
