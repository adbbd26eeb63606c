//! Draw/discard pile management.
//!
//! Every card in a room lives in exactly one place at a time: the draw
//! pile, the discard pile, the current-prompt slot, or some player's hand.
//! The deck operations here move cards between those places without ever
//! dropping or duplicating one, so the total per kind stays fixed for the
//! lifetime of the room.

use rand::seq::SliceRandom;
use thiserror::Error;

use super::PromptCard;

/// Deck errors.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum DeckError {
    /// Both the draw and discard piles are empty. With the card-count
    /// validation done at room creation this indicates an internal
    /// consistency fault, not a user mistake.
    #[error("deck exhausted: draw and discard piles are both empty")]
    Exhausted,
}

/// An ordered pair of piles over one card kind. The top of each pile is
/// the end of its vec.
#[derive(Clone, Debug)]
pub struct Deck<C> {
    draw: Vec<C>,
    discard: Vec<C>,
}

// Not derived: the derive would demand `C: Default` for an empty deck.
impl<C> Default for Deck<C> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<C> Deck<C> {
    pub fn new(cards: Vec<C>) -> Self {
        Self {
            draw: cards,
            discard: Vec::new(),
        }
    }

    /// Uniformly permutes the draw pile in place. The discard pile keeps
    /// its order.
    pub fn shuffle_draw(&mut self) {
        self.draw.shuffle(&mut rand::rng());
    }

    /// Pops one card off the draw pile. An empty draw pile is refilled
    /// from the discard pile (then shuffled) first; only when both piles
    /// are empty does this fail.
    pub fn draw(&mut self) -> Result<C, DeckError> {
        if self.draw.is_empty() {
            if self.discard.is_empty() {
                return Err(DeckError::Exhausted);
            }
            self.draw.append(&mut self.discard);
            self.shuffle_draw();
        }
        // Non-empty after refill.
        self.draw.pop().ok_or(DeckError::Exhausted)
    }

    /// Appends a card to the discard pile.
    pub fn discard(&mut self, card: C) {
        self.discard.push(card);
    }

    /// Appends a batch of cards to the discard pile.
    pub fn discard_all<I: IntoIterator<Item = C>>(&mut self, cards: I) {
        self.discard.extend(cards);
    }

    pub fn draw_len(&self) -> usize {
        self.draw.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Total cards held by the deck itself (excludes hands and the
    /// current-prompt slot).
    pub fn len(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A prompt deck: draw/discard piles plus the single current-prompt slot.
#[derive(Clone, Debug, Default)]
pub struct PromptDeck {
    pub deck: Deck<PromptCard>,
    current: Option<PromptCard>,
}

impl PromptDeck {
    pub fn new(cards: Vec<PromptCard>) -> Self {
        Self {
            deck: Deck::new(cards),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&PromptCard> {
        self.current.as_ref()
    }

    /// Moves the current prompt (if any) to the discard pile and installs
    /// a freshly drawn one.
    pub fn advance(&mut self) -> Result<&PromptCard, DeckError> {
        let next = self.deck.draw()?;
        if let Some(old) = self.current.replace(next) {
            self.deck.discard(old);
        }
        // Just installed above.
        self.current.as_ref().ok_or(DeckError::Exhausted)
    }

    /// Clears the current slot, returning the card to the discard pile.
    pub fn reset(&mut self) {
        if let Some(old) = self.current.take() {
            self.deck.discard(old);
        }
    }

    /// Total cards held by the prompt deck, current slot included.
    pub fn len(&self) -> usize {
        self.deck.len() + usize::from(self.current.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
