//! Game engine: the per-room phase state machine.
//!
//! A room cycles `Idle -> Playing -> Judging -> Scoring -> Playing -> ...`
//! until stopped or emptied. Transitions are driven either by a player
//! action (start, stop, the last required card being played, the judge
//! voting) or by the room actor's phase timer firing. The engine itself is
//! synchronous and single-writer; the actor serializes timer fires against
//! player actions, so exactly one entry action runs per transition.
//!
//! Scheduling is deadline-of-record: entering a timed phase records both a
//! monotonic deadline (for the actor's sleep) and a wall-clock timestamp
//! (for the views). Entering Idle clears the deadline, which implicitly
//! cancels any pending timer; a stale timer fire that still lands observes
//! `Idle` and no-ops.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tokio::time::Instant;

use super::errors::GameError;
use super::roster::{Roster, User, UserId};
use super::view::{PlayerPublic, RoomSummary, UserView};
use crate::cards::{CardId, Deck, PromptCard, PromptDeck, ResponseCard};
use crate::room::config::RoomConfig;

/// Minimum number of players required to start a game.
pub const MIN_START_PLAYERS: usize = 4;

/// Minimum number of prompt cards required to create a room.
pub const MIN_PROMPT_CARDS: usize = 10;

/// Game phase. The numeric indices are part of the wire format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    Playing,
    Judging,
    Scoring,
}

impl Phase {
    pub const fn index(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Playing => 1,
            Self::Judging => 2,
            Self::Scoring => 3,
        }
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

/// What a departure did to the room, so the caller can react (delete an
/// emptied room, log a forced stop).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeaveOutcome {
    /// The player was actually in the room.
    pub removed: bool,
    /// The departure dropped the roster below the start threshold while
    /// running and forced the game back to Idle.
    pub stopped: bool,
}

/// A single room's game state: decks, roster, phase, and round bookkeeping.
#[derive(Debug)]
pub struct Game {
    config: RoomConfig,
    roster: Roster,
    owner_id: Option<UserId>,
    judge_id: Option<UserId>,
    phase: Phase,
    /// Player id -> cards submitted this round. Cleared every round.
    submissions: HashMap<UserId, Vec<ResponseCard>>,
    prompts: PromptDeck,
    responses: Deck<ResponseCard>,
    phase_deadline: Option<Instant>,
    next_phase_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Validates parameters and builds a game in `Idle` with full draw
    /// piles and an empty roster.
    pub fn new(
        config: RoomConfig,
        prompt_cards: Vec<PromptCard>,
        response_cards: Vec<ResponseCard>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        if prompt_cards.len() < MIN_PROMPT_CARDS {
            return Err(GameError::TooFewPromptCards {
                needed: MIN_PROMPT_CARDS,
            });
        }
        if prompt_cards.iter().any(|c| c.answer_fields == 0) {
            return Err(GameError::PromptWithoutAnswerFields);
        }
        let needed = config.max_players * config.hand_size;
        if response_cards.len() < needed {
            return Err(GameError::TooFewResponseCards {
                needed,
                max_players: config.max_players,
            });
        }
        Ok(Self {
            config,
            roster: Roster::new(),
            owner_id: None,
            judge_id: None,
            phase: Phase::Idle,
            submissions: HashMap::new(),
            prompts: PromptDeck::new(prompt_cards),
            responses: Deck::new(response_cards),
            phase_deadline: None,
            next_phase_at: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn owner_id(&self) -> Option<UserId> {
        self.owner_id
    }

    pub fn judge_id(&self) -> Option<UserId> {
        self.judge_id
    }

    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    pub fn max_players(&self) -> usize {
        self.config.max_players
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn contains_player(&self, id: UserId) -> bool {
        self.roster.contains(id)
    }

    /// Deadline the actor should sleep until, if a phase change is
    /// scheduled.
    pub fn phase_deadline(&self) -> Option<Instant> {
        self.phase_deadline
    }

    // -- Roster management ---------------------------------------------

    /// Adds a user to the room. The first joiner becomes owner. No-op for
    /// users already present. Returns whether the roster changed.
    pub fn join(&mut self, user: User) -> bool {
        let id = user.id;
        let joined = self.roster.join(user);
        if joined && self.owner_id.is_none() {
            self.owner_id = Some(id);
        }
        joined
    }

    /// Removes a player, returning their cards to the discard piles and
    /// reassigning the owner/judge roles as needed. Dropping below the
    /// start threshold while running stops the game.
    pub fn leave(&mut self, id: UserId) -> LeaveOutcome {
        let Some(player) = self.roster.remove(id) else {
            return LeaveOutcome {
                removed: false,
                stopped: false,
            };
        };
        self.responses.discard_all(player.hand);
        if let Some(cards) = self.submissions.remove(&id) {
            self.responses.discard_all(cards);
        }

        if self.owner_id == Some(id) {
            self.owner_id = self.roster.first().map(|p| p.user.id);
        }

        let mut stopped = false;
        if self.is_running() {
            if self.roster.len() < MIN_START_PLAYERS {
                log::info!(
                    "room '{}': {} players left, stopping",
                    self.config.name,
                    self.roster.len()
                );
                self.enter_idle();
                stopped = true;
            } else if self.judge_id == Some(id) {
                self.replace_departed_judge();
            }
        }

        LeaveOutcome {
            removed: true,
            stopped,
        }
    }

    /// Owner-only removal of another player.
    pub fn kick(&mut self, requester: UserId, target: UserId) -> Result<LeaveOutcome, GameError> {
        if self.owner_id != Some(requester) {
            return Err(GameError::NotOwner);
        }
        if requester == target {
            return Err(GameError::CannotKickSelf);
        }
        if !self.roster.contains(target) {
            return Err(GameError::PlayerNotFound);
        }
        Ok(self.leave(target))
    }

    // -- Player actions -------------------------------------------------

    /// Starts the game loop. Owner only, from Idle, with at least
    /// [`MIN_START_PLAYERS`] players.
    pub fn start(&mut self, user_id: UserId) -> Result<(), GameError> {
        if self.owner_id != Some(user_id) {
            return Err(GameError::NotOwner);
        }
        if self.is_running() {
            return Err(GameError::AlreadyRunning);
        }
        if self.roster.len() < MIN_START_PLAYERS {
            return Err(GameError::InsufficientPlayers {
                needed: MIN_START_PLAYERS - self.roster.len(),
            });
        }
        self.enter_playing(true)
    }

    /// Stops the game loop and resets decks, hands, and round state.
    /// Owner only. The roster survives.
    pub fn stop(&mut self, user_id: UserId) -> Result<(), GameError> {
        if self.owner_id != Some(user_id) {
            return Err(GameError::NotOwner);
        }
        if !self.is_running() {
            return Err(GameError::NotRunning);
        }
        self.enter_idle();
        Ok(())
    }

    /// Plays one card from a player's hand into their submission for the
    /// current prompt. When the last required card lands, the round
    /// advances to Judging immediately instead of waiting for the timer.
    pub fn play_card(&mut self, player_id: UserId, card_id: CardId) -> Result<(), GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::NotPlayingPhase);
        }
        if self.judge_id == Some(player_id) {
            return Err(GameError::IsJudge);
        }
        let required = self.required_submissions()?;
        let submitted = self.submissions.get(&player_id).map_or(0, Vec::len);
        if submitted >= required {
            return Err(if required == 1 {
                GameError::AlreadyPlayedCard
            } else {
                GameError::AlreadyPlayedAllCards
            });
        }

        let player = self
            .roster
            .get_mut(player_id)
            .ok_or(GameError::PlayerNotFound)?;
        let idx = player
            .hand
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(GameError::CardNotInHand)?;
        let card = player.hand.remove(idx);
        self.submissions.entry(player_id).or_default().push(card);

        if self.all_players_submitted(required) {
            self.enter_judging();
        }
        Ok(())
    }

    /// Judge's vote for a submitted card. Resolves the card's owner and
    /// moves the round to Scoring, which awards the point.
    pub fn vote_card(&mut self, judge_id: UserId, card_id: CardId) -> Result<(), GameError> {
        if self.judge_id != Some(judge_id) {
            return Err(GameError::NotJudge);
        }
        if self.phase != Phase::Judging {
            return Err(GameError::NotJudgingPhase);
        }
        let winner = self
            .submissions
            .iter()
            .find(|(_, cards)| cards.iter().any(|c| c.id == card_id))
            .map(|(id, _)| *id)
            .ok_or(GameError::CardNotFound)?;
        self.enter_scoring(Some(winner))
    }

    /// Timer-driven phase advancement. A fire that lands after a stop is
    /// a silent no-op. Returns whether anything changed.
    pub fn advance(&mut self) -> Result<bool, GameError> {
        match self.phase {
            Phase::Idle => Ok(false),
            Phase::Playing => {
                self.enter_judging();
                Ok(true)
            }
            // Timed out without a vote: nobody scores this round.
            Phase::Judging => {
                self.enter_scoring(None)?;
                Ok(true)
            }
            Phase::Scoring => {
                self.enter_playing(false)?;
                Ok(true)
            }
        }
    }

    // -- Entry actions ---------------------------------------------------

    fn enter_idle(&mut self) {
        self.clear_submissions();
        for player in self.roster.iter_mut() {
            self.responses.discard_all(player.hand.drain(..));
        }
        self.prompts.reset();
        self.judge_id = None;
        self.phase = Phase::Idle;
        self.phase_deadline = None;
        self.next_phase_at = None;
        log::debug!("room '{}': entered Idle", self.config.name);
    }

    fn enter_playing(&mut self, from_idle: bool) -> Result<(), GameError> {
        // The previous round's submissions stay visible through Scoring;
        // they return to the discard pile only when the next round deals.
        self.clear_submissions();
        if from_idle {
            self.prompts.deck.shuffle_draw();
            self.responses.shuffle_draw();
            self.judge_id = self.roster.first().map(|p| p.user.id);
            self.prompts.advance()?;
        }
        self.fill_hands()?;
        self.phase = Phase::Playing;
        self.schedule_phase();
        log::debug!("room '{}': entered Playing", self.config.name);
        Ok(())
    }

    fn enter_judging(&mut self) {
        self.phase = Phase::Judging;
        self.schedule_phase();
        log::debug!("room '{}': entered Judging", self.config.name);
    }

    fn enter_scoring(&mut self, winner: Option<UserId>) -> Result<(), GameError> {
        if let Some(id) = winner {
            if let Some(player) = self.roster.get_mut(id) {
                player.score += 1;
                log::info!(
                    "room '{}': {} won the round ({} points)",
                    self.config.name,
                    player.user.name,
                    player.score
                );
            }
        }
        self.prompts.advance()?;
        self.judge_id = self
            .judge_id
            .and_then(|id| self.roster.next_after(id))
            .map(|p| p.user.id);
        self.phase = Phase::Scoring;
        self.schedule_phase();
        log::debug!("room '{}': entered Scoring", self.config.name);
        Ok(())
    }

    // -- Views -----------------------------------------------------------

    /// The room state as seen by one player. Users outside the roster get
    /// the public slice with an empty hand.
    pub fn view_for(&self, user_id: UserId) -> UserView {
        let required = self.required_submissions().unwrap_or(0);
        let mut revealed: HashMap<UserId, Vec<ResponseCard>> = HashMap::new();
        let mut hidden: Vec<Vec<ResponseCard>> = Vec::new();

        if let Some(own) = self.submissions.get(&user_id) {
            revealed.insert(user_id, own.clone());
        }
        match self.phase {
            Phase::Judging => {
                for (id, cards) in &self.submissions {
                    if *id != user_id {
                        hidden.push(cards.clone());
                    }
                }
            }
            Phase::Scoring => {
                for (id, cards) in &self.submissions {
                    revealed.insert(*id, cards.clone());
                }
            }
            Phase::Idle | Phase::Playing => {}
        }

        let players = self
            .roster
            .iter()
            .map(|p| PlayerPublic {
                id: p.user.id,
                name: p.user.name.clone(),
                score: p.score,
                has_played: required > 0
                    && self.submissions.get(&p.user.id).map_or(0, Vec::len) >= required,
            })
            .collect();

        UserView {
            name: self.config.name.clone(),
            prompt_card: self.prompts.current().cloned(),
            submissions_hidden: hidden,
            submissions_revealed: revealed,
            judge_id: self.judge_id,
            owner_id: self.owner_id,
            players,
            hand: self
                .roster
                .get(user_id)
                .map(|p| p.hand.clone())
                .unwrap_or_default(),
            phase: self.phase,
            next_phase_at: self.next_phase_at,
        }
    }

    /// The lobby-listing row for this room.
    pub fn summary(&self) -> RoomSummary {
        let owner = self.owner_id.and_then(|id| self.roster.get(id));
        RoomSummary {
            name: self.config.name.clone(),
            owner_id: self.owner_id,
            owner_name: owner.map(|p| p.user.name.clone()),
        }
    }

    /// Ids of everyone who should receive a view push.
    pub fn player_ids(&self) -> Vec<UserId> {
        self.roster.iter().map(|p| p.user.id).collect()
    }

    // -- Conservation accounting (used by tests) -------------------------

    /// Total prompt cards across draw, discard, and the current slot.
    pub fn prompt_card_count(&self) -> usize {
        self.prompts.len()
    }

    /// Total response cards across draw, discard, hands, and submissions.
    pub fn response_card_count(&self) -> usize {
        self.responses.len()
            + self.roster.cards_in_hands()
            + self.submissions.values().map(Vec::len).sum::<usize>()
    }

    // -- Helpers ---------------------------------------------------------

    /// Cards each non-judge player must submit for the current prompt.
    fn required_submissions(&self) -> Result<usize, GameError> {
        // A current prompt is always installed while running.
        self.prompts
            .current()
            .map(|c| c.answer_fields)
            .ok_or(GameError::DeckExhausted)
    }

    fn all_players_submitted(&self, required: usize) -> bool {
        self.roster
            .iter()
            .filter(|p| self.judge_id != Some(p.user.id))
            .all(|p| self.submissions.get(&p.user.id).map_or(0, Vec::len) >= required)
    }

    fn clear_submissions(&mut self) {
        for (_, cards) in self.submissions.drain() {
            self.responses.discard_all(cards);
        }
    }

    fn fill_hands(&mut self) -> Result<(), GameError> {
        let target = self.config.hand_size;
        let ids: Vec<UserId> = self.roster.iter().map(|p| p.user.id).collect();
        for id in ids {
            while self.roster.get(id).map_or(0, |p| p.hand.len()) < target {
                let card = self.responses.draw()?;
                if let Some(player) = self.roster.get_mut(id) {
                    player.hand.push(card);
                }
            }
        }
        Ok(())
    }

    fn schedule_phase(&mut self) {
        let interval = self.config.phase_interval;
        self.phase_deadline = Some(Instant::now() + interval);
        let delta = TimeDelta::from_std(interval).unwrap_or_else(|_| TimeDelta::zero());
        self.next_phase_at = Some(Utc::now() + delta);
    }

    /// The judge left mid-round: the round cannot be decided, so void the
    /// submissions, hand the gavel to the earliest remaining player, and
    /// restart the round on a fresh prompt.
    fn replace_departed_judge(&mut self) {
        self.judge_id = self.roster.first().map(|p| p.user.id);
        if matches!(self.phase, Phase::Playing | Phase::Judging) {
            if self.prompts.advance().is_err() {
                // Unreachable while the conservation invariant holds.
                log::error!("room '{}': prompt deck exhausted", self.config.name);
                self.enter_idle();
                return;
            }
            if self.enter_playing(false).is_err() {
                log::error!("room '{}': response deck exhausted", self.config.name);
                self.enter_idle();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str, max_players: usize) -> RoomConfig {
        RoomConfig::new(name, max_players)
    }

    fn prompt_cards(n: usize, answer_fields: usize) -> Vec<PromptCard> {
        (0..n)
            .map(|i| PromptCard::new(i as i64, &format!("prompt {i}"), answer_fields, 1))
            .collect()
    }

    fn response_cards(n: usize) -> Vec<ResponseCard> {
        (0..n)
            .map(|i| ResponseCard::new(1000 + i as i64, &format!("response {i}"), 1))
            .collect()
    }

    fn game_with_players(n: usize) -> Game {
        let mut game = Game::new(
            config("test", 10),
            prompt_cards(100, 1),
            response_cards(100),
        )
        .unwrap();
        for id in 1..=n as i64 {
            game.join(User::new(id, &format!("player{id}")));
        }
        game
    }

    fn started_game(n: usize) -> Game {
        let mut game = game_with_players(n);
        game.start(1).unwrap();
        game
    }

    fn assert_conserved(game: &Game) {
        assert_eq!(game.prompt_card_count(), 100);
        assert_eq!(game.response_card_count(), 100);
    }

    #[test]
    fn creation_validates_card_counts() {
        let err = Game::new(config("test", 10), prompt_cards(9, 1), response_cards(100))
            .unwrap_err();
        assert_eq!(err, GameError::TooFewPromptCards { needed: 10 });

        let err = Game::new(config("test", 10), prompt_cards(10, 1), response_cards(79))
            .unwrap_err();
        assert_eq!(
            err,
            GameError::TooFewResponseCards {
                needed: 80,
                max_players: 10
            }
        );
    }

    #[test]
    fn first_joiner_becomes_owner() {
        let mut game = game_with_players(3);
        assert_eq!(game.owner_id(), Some(1));
        // Rejoining does not change anything.
        assert!(!game.join(User::new(1, "player1")));
        assert_eq!(game.player_count(), 3);
    }

    #[test]
    fn start_requires_owner_and_enough_players() {
        let mut game = game_with_players(3);
        assert_eq!(game.start(2), Err(GameError::NotOwner));
        assert_eq!(
            game.start(1),
            Err(GameError::InsufficientPlayers { needed: 1 })
        );

        game.join(User::new(4, "player4"));
        game.start(1).unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.start(1), Err(GameError::AlreadyRunning));
    }

    #[test]
    fn start_deals_full_hands_and_picks_first_judge() {
        let game = started_game(4);
        assert_eq!(game.judge_id(), Some(1));
        for id in 1..=4 {
            assert_eq!(game.view_for(id).hand.len(), 8);
        }
        assert!(game.phase_deadline().is_some());
        assert_conserved(&game);
    }

    #[test]
    fn judge_cannot_play_and_hand_is_checked() {
        let mut game = started_game(4);
        let judge = game.judge_id().unwrap();
        let judge_card = game.view_for(judge).hand[0].id;
        assert_eq!(game.play_card(judge, judge_card), Err(GameError::IsJudge));

        // Card not in hand.
        assert_eq!(game.play_card(2, -5), Err(GameError::CardNotInHand));
    }

    #[test]
    fn double_submission_is_rejected_with_single_answer_message() {
        let mut game = started_game(4);
        let card = game.view_for(2).hand[0].id;
        game.play_card(2, card).unwrap();
        let next = game.view_for(2).hand[0].id;
        assert_eq!(game.play_card(2, next), Err(GameError::AlreadyPlayedCard));
        assert_conserved(&game);
    }

    #[test]
    fn all_submissions_advance_to_judging_early() {
        let mut game = started_game(4);
        for id in 2..=4 {
            assert_eq!(game.phase(), Phase::Playing);
            let card = game.view_for(id).hand[0].id;
            game.play_card(id, card).unwrap();
        }
        assert_eq!(game.phase(), Phase::Judging);
        assert_conserved(&game);
    }

    #[test]
    fn multi_answer_prompts_require_every_field() {
        let mut game = Game::new(
            config("test", 10),
            prompt_cards(100, 2),
            response_cards(100),
        )
        .unwrap();
        for id in 1..=4 {
            game.join(User::new(id, &format!("player{id}")));
        }
        game.start(1).unwrap();

        for id in 2..=4 {
            let card = game.view_for(id).hand[0].id;
            game.play_card(id, card).unwrap();
        }
        // One card each is not enough for a two-answer prompt.
        assert_eq!(game.phase(), Phase::Playing);
        for id in 2..=4 {
            let card = game.view_for(id).hand[0].id;
            game.play_card(id, card).unwrap();
        }
        assert_eq!(game.phase(), Phase::Judging);

        let extra = game.view_for(2).hand[0].id;
        assert_eq!(game.play_card(2, extra), Err(GameError::NotPlayingPhase));
    }

    #[test]
    fn vote_awards_exactly_one_point_and_rotates_judge() {
        let mut game = started_game(4);
        let played: Vec<(UserId, CardId)> = (2..=4)
            .map(|id| {
                let card = game.view_for(id).hand[0].id;
                game.play_card(id, card).unwrap();
                (id, card)
            })
            .collect();
        assert_eq!(game.phase(), Phase::Judging);

        assert_eq!(game.vote_card(2, played[0].1), Err(GameError::NotJudge));
        assert_eq!(game.vote_card(1, -1), Err(GameError::CardNotFound));

        game.vote_card(1, played[1].1).unwrap();
        assert_eq!(game.phase(), Phase::Scoring);
        let view = game.view_for(1);
        let winner = view.players.iter().find(|p| p.id == played[1].0).unwrap();
        assert_eq!(winner.score, 1);
        assert!(view.players.iter().filter(|p| p.score > 0).count() == 1);
        // Judge advanced in roster order.
        assert_eq!(game.judge_id(), Some(2));
        assert_conserved(&game);
    }

    #[test]
    fn judging_timeout_scores_nobody() {
        let mut game = started_game(4);
        for id in 2..=4 {
            let card = game.view_for(id).hand[0].id;
            game.play_card(id, card).unwrap();
        }
        game.advance().unwrap();
        assert_eq!(game.phase(), Phase::Scoring);
        assert!(game.view_for(1).players.iter().all(|p| p.score == 0));
        assert_conserved(&game);
    }

    #[test]
    fn scoring_timeout_loops_back_to_playing_with_full_hands() {
        let mut game = started_game(4);
        for id in 2..=4 {
            let card = game.view_for(id).hand[0].id;
            game.play_card(id, card).unwrap();
        }
        let first_prompt = game.view_for(1).prompt_card.unwrap().id;
        game.advance().unwrap(); // Judging -> Scoring
        let second_prompt = game.view_for(1).prompt_card.unwrap().id;
        assert_ne!(first_prompt, second_prompt);
        // The old round stays on the table for everyone to see.
        assert_eq!(game.view_for(1).submissions_revealed.len(), 3);

        game.advance().unwrap(); // Scoring -> Playing
        assert_eq!(game.phase(), Phase::Playing);
        for id in 1..=4 {
            let view = game.view_for(id);
            assert_eq!(view.hand.len(), 8);
            assert!(view.submissions_revealed.is_empty());
        }
        assert_conserved(&game);
    }

    #[test]
    fn stop_resets_decks_and_keeps_roster() {
        let mut game = started_game(4);
        let card = game.view_for(2).hand[0].id;
        game.play_card(2, card).unwrap();

        assert_eq!(game.stop(3), Err(GameError::NotOwner));
        game.stop(1).unwrap();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.stop(1), Err(GameError::NotRunning));

        assert_eq!(game.player_count(), 4);
        assert_eq!(game.judge_id(), None);
        assert!(game.phase_deadline().is_none());
        for id in 1..=4 {
            assert!(game.view_for(id).hand.is_empty());
        }
        assert_conserved(&game);
    }

    #[test]
    fn scores_survive_stop_and_restart() {
        let mut game = started_game(4);
        let played: Vec<CardId> = (2..=4)
            .map(|id| {
                let card = game.view_for(id).hand[0].id;
                game.play_card(id, card).unwrap();
                card
            })
            .collect();
        game.vote_card(1, played[0]).unwrap();
        game.stop(1).unwrap();

        game.start(1).unwrap();
        let view = game.view_for(1);
        assert_eq!(view.players.iter().map(|p| p.score).sum::<u32>(), 1);
        assert_conserved(&game);
    }

    #[test]
    fn creation_rejects_prompts_without_answer_fields() {
        let mut prompts = prompt_cards(100, 1);
        prompts[17].answer_fields = 0;
        let err = Game::new(config("test", 10), prompts, response_cards(100)).unwrap_err();
        assert_eq!(err, GameError::PromptWithoutAnswerFields);
    }

    #[test]
    fn timer_fire_after_stop_is_a_silent_noop() {
        let mut game = started_game(4);
        game.stop(1).unwrap();
        assert_eq!(game.advance(), Ok(false));
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn leaving_below_threshold_stops_the_game() {
        let mut game = started_game(4);
        let card = game.view_for(2).hand[0].id;
        game.play_card(2, card).unwrap();

        let outcome = game.leave(3);
        assert!(outcome.removed && outcome.stopped);
        assert_eq!(game.phase(), Phase::Idle);
        // The departed player's cards went back to the discard pile.
        assert_conserved(&game);
    }

    #[test]
    fn owner_leave_transfers_to_earliest_remaining() {
        let mut game = game_with_players(3);
        game.leave(1);
        assert_eq!(game.owner_id(), Some(2));
        game.leave(2);
        game.leave(3);
        assert_eq!(game.owner_id(), None);
        assert!(game.is_empty());
    }

    #[test]
    fn judge_leave_mid_round_voids_submissions_and_restarts() {
        let mut game = started_game(5);
        for id in 2..=4 {
            let card = game.view_for(id).hand[0].id;
            game.play_card(id, card).unwrap();
        }
        let outcome = game.leave(1); // the judge
        assert!(outcome.removed && !outcome.stopped);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.judge_id(), Some(2));
        // Voided submissions are gone from everyone's view.
        let view = game.view_for(3);
        assert!(view.submissions_revealed.is_empty());
        assert!(view.players.iter().all(|p| !p.has_played));
        // Hands were topped back up for the new round.
        assert_eq!(game.view_for(3).hand.len(), 8);
        assert_conserved(&game);
    }

    #[test]
    fn kick_is_owner_only_and_never_self() {
        let mut game = game_with_players(4);
        assert_eq!(game.kick(2, 3), Err(GameError::NotOwner));
        assert_eq!(game.kick(1, 1), Err(GameError::CannotKickSelf));
        assert_eq!(game.kick(1, 99), Err(GameError::PlayerNotFound));
        game.kick(1, 3).unwrap();
        assert!(!game.contains_player(3));
    }

    #[test]
    fn failed_actions_leave_state_untouched() {
        let mut game = started_game(4);
        let before_phase = game.phase();
        let before_hand = game.view_for(2).hand.clone();

        assert!(game.play_card(2, -1).is_err());
        assert!(game.vote_card(1, -1).is_err());
        assert!(game.start(1).is_err());

        assert_eq!(game.phase(), before_phase);
        assert_eq!(game.view_for(2).hand, before_hand);
        assert_conserved(&game);
    }

    #[test]
    fn views_reveal_submissions_per_phase() {
        let mut game = started_game(4);
        let card2 = game.view_for(2).hand[0].id;
        game.play_card(2, card2).unwrap();

        // Playing: only your own submission is visible.
        let view3 = game.view_for(3);
        assert!(view3.submissions_revealed.is_empty());
        assert!(view3.submissions_hidden.is_empty());
        assert_eq!(game.view_for(2).submissions_revealed[&2][0].id, card2);

        for id in 3..=4 {
            let card = game.view_for(id).hand[0].id;
            game.play_card(id, card).unwrap();
        }

        // Judging: the judge never appears in the submission map, and
        // others' cards show up without attribution.
        let judge_view = game.view_for(1);
        assert_eq!(judge_view.submissions_hidden.len(), 3);
        assert!(!judge_view.submissions_revealed.contains_key(&1));
        assert_eq!(game.view_for(2).submissions_hidden.len(), 2);

        // Scoring: everyone sees everything attributed.
        game.vote_card(1, card2).unwrap();
        let view4 = game.view_for(4);
        assert_eq!(view4.submissions_revealed.len(), 3);
        assert!(view4.submissions_hidden.is_empty());
    }

    #[test]
    fn view_serializes_phase_as_number() {
        let game = started_game(4);
        let json = serde_json::to_value(game.view_for(2)).unwrap();
        assert_eq!(json["phase"], 1);
        assert!(json["nextPhaseAt"].is_string());
        assert_eq!(json["hand"].as_array().unwrap().len(), 8);
    }
}
