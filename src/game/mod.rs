//! Game engine: roster, phase state machine, and per-user views.

pub mod engine;
pub mod errors;
pub mod roster;
pub mod view;

pub use engine::{Game, LeaveOutcome, MIN_PROMPT_CARDS, MIN_START_PLAYERS, Phase};
pub use errors::{ErrorKind, GameError};
pub use roster::{Player, Roster, User, UserId};
pub use view::{PlayerPublic, RoomSummary, UserView};
