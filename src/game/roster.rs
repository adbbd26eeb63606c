//! Player roster.
//!
//! The roster preserves join order, which is what owner succession and
//! judge rotation key off: ownership transfers to the earliest remaining
//! player, and the judge advances to the next player in roster order,
//! wrapping around.

use serde::{Deserialize, Serialize};

use crate::cards::ResponseCard;

/// Type alias for user identifiers.
pub type UserId = i64;

/// A user as supplied by the identity resolver.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: UserId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// A player in a room: a user plus their private hand and score. Owned
/// exclusively by the game engine.
#[derive(Clone, Debug)]
pub struct Player {
    pub user: User,
    pub hand: Vec<ResponseCard>,
    pub score: u32,
}

impl Player {
    fn new(user: User) -> Self {
        Self {
            user,
            hand: Vec::new(),
            score: 0,
        }
    }
}

/// Join-ordered collection of players.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user with an empty hand and zero score. No-op if already
    /// present. Returns whether the roster changed.
    pub fn join(&mut self, user: User) -> bool {
        if self.contains(user.id) {
            return false;
        }
        self.players.push(Player::new(user));
        true
    }

    /// Removes and returns a player. The caller is responsible for
    /// routing the removed hand back to the discard pile.
    pub fn remove(&mut self, id: UserId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.user.id == id)?;
        Some(self.players.remove(idx))
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.players.iter().any(|p| p.user.id == id)
    }

    pub fn get(&self, id: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user.id == id)
    }

    pub fn get_mut(&mut self, id: UserId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.user.id == id)
    }

    /// Earliest player by join order.
    pub fn first(&self) -> Option<&Player> {
        self.players.first()
    }

    /// The player after `id` in roster order, wrapping. Falls back to the
    /// first player if `id` is no longer present.
    pub fn next_after(&self, id: UserId) -> Option<&Player> {
        match self.players.iter().position(|p| p.user.id == id) {
            Some(idx) => self.players.get((idx + 1) % self.players.len()),
            None => self.players.first(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Total cards across all hands, for conservation accounting.
    pub fn cards_in_hands(&self) -> usize {
        self.players.iter().map(|p| p.hand.len()).sum()
    }
}
