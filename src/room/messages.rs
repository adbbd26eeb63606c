//! Room actor message types.

use tokio::sync::{mpsc, oneshot};

use super::errors::RoomError;
use crate::cards::CardId;
use crate::game::{RoomSummary, User, UserId, UserView};

/// Messages that can be sent to a [`super::RoomActor`].
#[derive(Debug)]
pub enum RoomMessage {
    /// Add a user to the room.
    Join {
        user: User,
        respond: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Remove a user from the room.
    Leave {
        user_id: UserId,
        respond: oneshot::Sender<LeaveReply>,
    },

    /// Owner kicks another player.
    Kick {
        requester: UserId,
        target: UserId,
        respond: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Owner starts the game.
    Start {
        user_id: UserId,
        respond: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Owner stops the game.
    Stop {
        user_id: UserId,
        respond: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Play a card from hand into this round's submission.
    PlayCard {
        user_id: UserId,
        card_id: CardId,
        respond: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Judge votes for a submitted card.
    VoteCard {
        user_id: UserId,
        card_id: CardId,
        respond: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Current state from one user's perspective.
    GetView {
        user_id: UserId,
        respond: oneshot::Sender<UserView>,
    },

    /// Lobby-listing row.
    GetSummary { respond: oneshot::Sender<RoomSummary> },

    /// Register a state-push channel for a user.
    Subscribe {
        user_id: UserId,
        sender: mpsc::Sender<UserView>,
    },

    /// Drop a user's state-push channel.
    Unsubscribe { user_id: UserId },

    /// Shut the actor down.
    Close,
}

/// Outcome of a leave, so the directory can clean up emptied rooms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeaveReply {
    /// The user was actually a player here.
    pub removed: bool,
    /// Players remaining after the departure.
    pub remaining: usize,
}
