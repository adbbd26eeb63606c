//! Card records and deck bookkeeping.
//!
//! Cards come in two kinds: prompt cards (a fill-in-the-blank prompt that
//! asks for `answer_fields` responses) and response cards (the answers
//! players hold in hand). The two kinds are distinct types so a prompt can
//! never end up in a response pile. Cards are immutable once created.

pub mod deck;
pub mod source;

pub use deck::{Deck, DeckError, PromptDeck};
pub use source::{CardSource, CardSourceError, FixedCardSource};

use serde::{Deserialize, Serialize};

/// Type alias for card identifiers.
pub type CardId = i64;

/// Type alias for cardpack identifiers.
pub type CardpackId = i64;

/// A prompt card. Players answer it with `answer_fields` response cards.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptCard {
    pub id: CardId,
    pub text: String,
    pub answer_fields: usize,
    pub cardpack_id: CardpackId,
}

/// A response card, played from a player's hand to answer the current
/// prompt.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCard {
    pub id: CardId,
    pub text: String,
    pub cardpack_id: CardpackId,
}

impl PromptCard {
    pub fn new(id: CardId, text: &str, answer_fields: usize, cardpack_id: CardpackId) -> Self {
        Self {
            id,
            text: text.to_string(),
            answer_fields,
            cardpack_id,
        }
    }
}

impl ResponseCard {
    pub fn new(id: CardId, text: &str, cardpack_id: CardpackId) -> Self {
        Self {
            id,
            text: text.to_string(),
            cardpack_id,
        }
    }
}
