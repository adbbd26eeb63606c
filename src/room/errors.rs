//! Room directory error types.

use thiserror::Error;

use crate::game::GameError;

/// Errors surfaced by the room directory and actor plumbing.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RoomError {
    #[error("room name is taken")]
    NameTaken,
    #[error("room does not exist")]
    GameNotFound,
    #[error("you are already in this room")]
    AlreadyInGame,
    #[error("room is full")]
    GameFull,
    #[error("you are not in a room")]
    NotInGame,
    /// The room actor is gone (closed while a request was in flight).
    #[error("room is closed")]
    RoomClosed,

    #[error(transparent)]
    Game(#[from] GameError),
}
