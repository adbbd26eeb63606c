//! Room configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::GameError;

/// Maximum room name length in characters.
pub const MAX_ROOM_NAME_LEN: usize = 64;

/// Inclusive bounds for a room's player limit.
pub const MIN_PLAYER_LIMIT: usize = 3;
pub const MAX_PLAYER_LIMIT: usize = 20;

/// Cards each player holds at the top of a round.
pub const DEFAULT_HAND_SIZE: usize = 8;

/// Inclusive bounds for a room's hand size.
pub const MIN_HAND_SIZE: usize = 1;
pub const MAX_HAND_SIZE: usize = 20;

/// How long each timed phase lasts before the engine advances on its own.
pub const DEFAULT_PHASE_INTERVAL: Duration = Duration::from_secs(30);

/// Room configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoomConfig {
    /// Room name, unique within a directory.
    pub name: String,

    /// Maximum number of players.
    pub max_players: usize,

    /// Target hand size players are topped up to.
    pub hand_size: usize,

    /// Phase timer interval.
    #[serde(skip, default = "default_phase_interval")]
    pub phase_interval: Duration,
}

fn default_phase_interval() -> Duration {
    DEFAULT_PHASE_INTERVAL
}

impl RoomConfig {
    pub fn new(name: &str, max_players: usize) -> Self {
        Self {
            name: name.to_string(),
            max_players,
            hand_size: DEFAULT_HAND_SIZE,
            phase_interval: DEFAULT_PHASE_INTERVAL,
        }
    }

    /// Checks the room-shape parameters. Card counts are validated by the
    /// engine constructor, which knows the card pool.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.name.chars().count() > MAX_ROOM_NAME_LEN {
            return Err(GameError::NameTooLong);
        }
        if self.max_players < MIN_PLAYER_LIMIT || self.max_players > MAX_PLAYER_LIMIT {
            return Err(GameError::MaxPlayersOutOfRange);
        }
        if self.hand_size < MIN_HAND_SIZE || self.hand_size > MAX_HAND_SIZE {
            return Err(GameError::HandSizeOutOfRange);
        }
        Ok(())
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self::new("room", 10)
    }
}
