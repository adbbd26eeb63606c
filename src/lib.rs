//! # Cardroom
//!
//! A party card game room engine. Players join a named room, get dealt
//! hands from a shared card pool, and cycle through timed phases (play,
//! judge, score) until the room empties or its owner stops the game.
//!
//! ## Architecture
//!
//! Each room is an independent unit of state driven by a single-writer
//! state machine:
//!
//! - **Idle**: nothing scheduled, no judge, decks at rest
//! - **Playing**: non-judge players answer the current prompt from hand
//! - **Judging**: the judge picks a favourite among the submissions
//! - **Scoring**: the winner is awarded and the next round is staged
//!
//! Timed phases advance on a 30 second timer unless a terminating player
//! action (everyone submitted, the judge voted) pre-empts it. The room
//! actor serializes timer fires against player actions, so exactly one
//! entry action runs per transition.
//!
//! ## Core Modules
//!
//! - [`cards`]: card records, draw/discard decks, the card source seam
//! - [`game`]: the per-room engine, roster, and per-user views
//! - [`room`]: the actor hosting a room and the directory of rooms
//!
//! ## Example
//!
//! ```no_run
//! use cardroom::{RoomConfig, RoomDirectory, User};
//! # use cardroom::cards::{PromptCard, ResponseCard};
//!
//! # async fn demo(prompts: Vec<PromptCard>, responses: Vec<ResponseCard>) {
//! let directory = RoomDirectory::new();
//! let alice = User::new(1, "alice");
//! directory
//!     .create_room(alice, RoomConfig::new("kitchen", 10), prompts, responses)
//!     .await
//!     .unwrap();
//! # }
//! ```

/// Card records, deck bookkeeping, and the card source collaborator.
pub mod cards;
pub use cards::{CardId, CardSource, CardpackId, PromptCard, ResponseCard};

/// Core game logic: engine, roster, errors, and views.
pub mod game;
pub use game::{Game, GameError, Phase, RoomSummary, User, UserId, UserView};

/// Room hosting: actors and the room directory.
pub mod room;
pub use room::{RoomConfig, RoomDirectory, RoomError, RoomHandle};
