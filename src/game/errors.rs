//! Game error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::room::config::{
    MAX_HAND_SIZE, MAX_PLAYER_LIMIT, MAX_ROOM_NAME_LEN, MIN_HAND_SIZE, MIN_PLAYER_LIMIT,
};

/// Broad classification of a [`GameError`], useful for mapping to
/// transport status codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Room creation parameter violations.
    Validation,
    /// Caller lacks the owner or judge role.
    Authorization,
    /// Action invalid for the current phase.
    Phase,
    /// Action conflicts with room state (already running, full, ...).
    StateConflict,
    /// Room, card, or player lookup miss.
    NotFound,
    /// Internal consistency fault.
    Internal,
}

/// Errors produced by the game engine. All of them are recoverable: a
/// failed action leaves the engine exactly as it was before the call.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("room name must not exceed {MAX_ROOM_NAME_LEN} characters")]
    NameTooLong,
    #[error("max players must be between {MIN_PLAYER_LIMIT} and {MAX_PLAYER_LIMIT}")]
    MaxPlayersOutOfRange,
    #[error("hand size must be between {MIN_HAND_SIZE} and {MAX_HAND_SIZE}")]
    HandSizeOutOfRange,
    #[error("every prompt card must ask for at least one answer")]
    PromptWithoutAnswerFields,
    #[error("need at least {needed} prompt cards")]
    TooFewPromptCards { needed: usize },
    #[error("need at least {needed} response cards for {max_players} players")]
    TooFewResponseCards { needed: usize, max_players: usize },

    #[error("only the room owner can do that")]
    NotOwner,
    #[error("only the judge can vote on a card")]
    NotJudge,
    #[error("the judge cannot play cards")]
    IsJudge,
    #[error("you cannot kick yourself")]
    CannotKickSelf,

    #[error("cards cannot be played right now")]
    NotPlayingPhase,
    #[error("cards cannot be voted on right now")]
    NotJudgingPhase,

    #[error("game is already running")]
    AlreadyRunning,
    #[error("game is not running")]
    NotRunning,
    #[error("need {needed} more players to start")]
    InsufficientPlayers { needed: usize },
    #[error("you have already played a card this round")]
    AlreadyPlayedCard,
    #[error("you have already played all cards for this round")]
    AlreadyPlayedAllCards,

    #[error("cannot play a card that is not in your hand")]
    CardNotInHand,
    #[error("this card was not played by anyone")]
    CardNotFound,
    #[error("player is not in this room")]
    PlayerNotFound,

    #[error("deck exhausted: draw and discard piles are both empty")]
    DeckExhausted,
}

impl GameError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NameTooLong
            | Self::MaxPlayersOutOfRange
            | Self::HandSizeOutOfRange
            | Self::PromptWithoutAnswerFields
            | Self::TooFewPromptCards { .. }
            | Self::TooFewResponseCards { .. } => ErrorKind::Validation,
            Self::NotOwner | Self::NotJudge | Self::IsJudge | Self::CannotKickSelf => {
                ErrorKind::Authorization
            }
            Self::NotPlayingPhase | Self::NotJudgingPhase => ErrorKind::Phase,
            Self::AlreadyRunning
            | Self::NotRunning
            | Self::InsufficientPlayers { .. }
            | Self::AlreadyPlayedCard
            | Self::AlreadyPlayedAllCards => ErrorKind::StateConflict,
            Self::CardNotInHand | Self::CardNotFound | Self::PlayerNotFound => ErrorKind::NotFound,
            Self::DeckExhausted => ErrorKind::Internal,
        }
    }
}

impl From<crate::cards::DeckError> for GameError {
    fn from(_: crate::cards::DeckError) -> Self {
        Self::DeckExhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_classify_into_the_expected_buckets() {
        assert_eq!(GameError::NameTooLong.kind(), ErrorKind::Validation);
        assert_eq!(GameError::NotOwner.kind(), ErrorKind::Authorization);
        assert_eq!(GameError::NotPlayingPhase.kind(), ErrorKind::Phase);
        assert_eq!(
            GameError::InsufficientPlayers { needed: 2 }.kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(GameError::CardNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(GameError::DeckExhausted.kind(), ErrorKind::Internal);
    }

    #[test]
    fn insufficient_players_reports_how_many_more_are_needed() {
        let err = GameError::InsufficientPlayers { needed: 3 };
        assert_eq!(err.to_string(), "need 3 more players to start");
    }
}
