//! Per-user state projections.
//!
//! Every observable change produces one [`UserView`] per player, pushed
//! through the state sink. The view only ever contains what that player is
//! allowed to see: their own hand and submissions always, other players'
//! submissions anonymously while the judge deliberates, and fully
//! attributed once the round reaches Scoring.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::engine::Phase;
use super::roster::UserId;
use crate::cards::{PromptCard, ResponseCard};

/// The public slice of a player visible to everyone in the room.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPublic {
    pub id: UserId,
    pub name: String,
    pub score: u32,
    /// Whether this player has submitted the full required card count for
    /// the current prompt. Derived, never stored.
    pub has_played: bool,
}

/// The state of a room from the perspective of one player.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub name: String,
    pub prompt_card: Option<PromptCard>,
    /// Other players' submissions with attribution stripped. Populated
    /// only during Judging so the judge has something to vote on.
    pub submissions_hidden: Vec<Vec<ResponseCard>>,
    /// Attributed submissions: always the viewer's own, everyone's once
    /// the round reaches Scoring.
    pub submissions_revealed: HashMap<UserId, Vec<ResponseCard>>,
    pub judge_id: Option<UserId>,
    pub owner_id: Option<UserId>,
    pub players: Vec<PlayerPublic>,
    pub hand: Vec<ResponseCard>,
    pub phase: Phase,
    pub next_phase_at: Option<DateTime<Utc>>,
}

/// A room as seen from the lobby listing; safe for spectators.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub name: String,
    pub owner_id: Option<UserId>,
    pub owner_name: Option<String>,
}
