//! Room actor: one task per room, serializing player actions against the
//! phase timer.
//!
//! The actor is the room's single writer. Player actions arrive through
//! the mpsc inbox; the phase timer is a `sleep_until` on the engine's
//! deadline-of-record, raced against the inbox in one `select!`. Either
//! way, exactly one mutation applies at a time, and each observable change
//! is followed by a best-effort view push to every subscribed player.

use std::collections::HashMap;
use tokio::{
    sync::{mpsc, oneshot},
    time::{Duration, Instant, sleep_until},
};

use super::{
    errors::RoomError,
    messages::{LeaveReply, RoomMessage},
};
use crate::cards::CardId;
use crate::game::{Game, User, UserId, UserView};

/// Inbox depth per room.
const INBOX_CAPACITY: usize = 100;

/// Push channel depth per subscriber.
const PUSH_CAPACITY: usize = 32;

/// How long the timer branch parks when no phase change is scheduled.
/// Never actually fires; the select guard disables the branch.
const PARK_INTERVAL: Duration = Duration::from_secs(3600);

/// Cloneable handle for sending messages to a room actor.
#[derive(Clone, Debug)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomMessage>,
    name: String,
}

impl RoomHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomMessage,
    ) -> Result<T, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| RoomError::RoomClosed)?;
        rx.await.map_err(|_| RoomError::RoomClosed)
    }

    pub async fn join(&self, user: User) -> Result<(), RoomError> {
        self.request(|respond| RoomMessage::Join { user, respond })
            .await?
    }

    pub async fn leave(&self, user_id: UserId) -> Result<LeaveReply, RoomError> {
        self.request(|respond| RoomMessage::Leave { user_id, respond })
            .await
    }

    pub async fn kick(&self, requester: UserId, target: UserId) -> Result<(), RoomError> {
        self.request(|respond| RoomMessage::Kick {
            requester,
            target,
            respond,
        })
        .await?
    }

    pub async fn start(&self, user_id: UserId) -> Result<(), RoomError> {
        self.request(|respond| RoomMessage::Start { user_id, respond })
            .await?
    }

    pub async fn stop(&self, user_id: UserId) -> Result<(), RoomError> {
        self.request(|respond| RoomMessage::Stop { user_id, respond })
            .await?
    }

    pub async fn play_card(&self, user_id: UserId, card_id: CardId) -> Result<(), RoomError> {
        self.request(|respond| RoomMessage::PlayCard {
            user_id,
            card_id,
            respond,
        })
        .await?
    }

    pub async fn vote_card(&self, user_id: UserId, card_id: CardId) -> Result<(), RoomError> {
        self.request(|respond| RoomMessage::VoteCard {
            user_id,
            card_id,
            respond,
        })
        .await?
    }

    pub async fn view(&self, user_id: UserId) -> Result<UserView, RoomError> {
        self.request(|respond| RoomMessage::GetView { user_id, respond })
            .await
    }

    pub async fn summary(&self) -> Result<crate::game::RoomSummary, RoomError> {
        self.request(|respond| RoomMessage::GetSummary { respond })
            .await
    }

    /// Registers a push channel for a user and returns the receiving end.
    pub async fn subscribe(&self, user_id: UserId) -> Result<mpsc::Receiver<UserView>, RoomError> {
        let (tx, rx) = mpsc::channel(PUSH_CAPACITY);
        self.sender
            .send(RoomMessage::Subscribe {
                user_id,
                sender: tx,
            })
            .await
            .map_err(|_| RoomError::RoomClosed)?;
        Ok(rx)
    }

    pub async fn unsubscribe(&self, user_id: UserId) -> Result<(), RoomError> {
        self.sender
            .send(RoomMessage::Unsubscribe { user_id })
            .await
            .map_err(|_| RoomError::RoomClosed)
    }

    pub async fn close(&self) {
        let _ = self.sender.send(RoomMessage::Close).await;
    }
}

/// Actor owning a single room's game state.
pub struct RoomActor {
    game: Game,
    inbox: mpsc::Receiver<RoomMessage>,
    subscribers: HashMap<UserId, mpsc::Sender<UserView>>,
    closed: bool,
}

impl RoomActor {
    pub fn new(game: Game) -> (Self, RoomHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let name = game.name().to_string();
        let actor = Self {
            game,
            inbox,
            subscribers: HashMap::new(),
            closed: false,
        };
        (actor, RoomHandle { sender, name })
    }

    /// Runs the room event loop until closed or all handles drop.
    pub async fn run(mut self) {
        log::info!("room '{}' starting", self.game.name());

        loop {
            let deadline = self.game.phase_deadline();
            let timer = sleep_until(deadline.unwrap_or_else(|| Instant::now() + PARK_INTERVAL));

            tokio::select! {
                maybe = self.inbox.recv() => {
                    match maybe {
                        Some(message) => {
                            self.handle_message(message);
                            if self.closed {
                                break;
                            }
                        }
                        None => break,
                    }
                }

                () = timer, if deadline.is_some() => {
                    self.fire_timer();
                }
            }
        }

        log::info!("room '{}' closed", self.game.name());
    }

    /// Timer fired: advance the phase of record. A fire that raced with a
    /// stop finds Idle and does nothing.
    fn fire_timer(&mut self) {
        match self.game.advance() {
            Ok(true) => {
                log::debug!(
                    "room '{}': timer advanced phase to {:?}",
                    self.game.name(),
                    self.game.phase()
                );
                self.broadcast();
            }
            Ok(false) => {}
            Err(e) => {
                log::error!("room '{}': timer advance failed: {e}", self.game.name());
            }
        }
    }

    fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join { user, respond } => {
                let result = self.handle_join(user);
                let _ = respond.send(result);
            }

            RoomMessage::Leave { user_id, respond } => {
                let outcome = self.game.leave(user_id);
                self.subscribers.remove(&user_id);
                if outcome.removed {
                    log::info!("user {user_id} left room '{}'", self.game.name());
                    self.broadcast();
                }
                let _ = respond.send(LeaveReply {
                    removed: outcome.removed,
                    remaining: self.game.player_count(),
                });
            }

            RoomMessage::Kick {
                requester,
                target,
                respond,
            } => {
                let result = self
                    .game
                    .kick(requester, target)
                    .map(|_| {
                        log::info!("user {target} kicked from room '{}'", self.game.name());
                        self.subscribers.remove(&target);
                        self.broadcast();
                    })
                    .map_err(RoomError::from);
                let _ = respond.send(result);
            }

            RoomMessage::Start { user_id, respond } => {
                let result = self.game.start(user_id).map_err(RoomError::from);
                if result.is_ok() {
                    self.broadcast();
                }
                let _ = respond.send(result);
            }

            RoomMessage::Stop { user_id, respond } => {
                let result = self.game.stop(user_id).map_err(RoomError::from);
                if result.is_ok() {
                    self.broadcast();
                }
                let _ = respond.send(result);
            }

            RoomMessage::PlayCard {
                user_id,
                card_id,
                respond,
            } => {
                let result = self.game.play_card(user_id, card_id).map_err(RoomError::from);
                if result.is_ok() {
                    self.broadcast();
                }
                let _ = respond.send(result);
            }

            RoomMessage::VoteCard {
                user_id,
                card_id,
                respond,
            } => {
                let result = self.game.vote_card(user_id, card_id).map_err(RoomError::from);
                if result.is_ok() {
                    self.broadcast();
                }
                let _ = respond.send(result);
            }

            RoomMessage::GetView { user_id, respond } => {
                let _ = respond.send(self.game.view_for(user_id));
            }

            RoomMessage::GetSummary { respond } => {
                let _ = respond.send(self.game.summary());
            }

            RoomMessage::Subscribe { user_id, sender } => {
                self.subscribers.insert(user_id, sender);
                log::debug!("user {user_id} subscribed to room '{}'", self.game.name());
            }

            RoomMessage::Unsubscribe { user_id } => {
                self.subscribers.remove(&user_id);
                log::debug!(
                    "user {user_id} unsubscribed from room '{}'",
                    self.game.name()
                );
            }

            RoomMessage::Close => {
                self.closed = true;
            }
        }
    }

    fn handle_join(&mut self, user: User) -> Result<(), RoomError> {
        if !self.game.contains_player(user.id) && self.game.player_count() >= self.game.max_players()
        {
            return Err(RoomError::GameFull);
        }
        let id = user.id;
        if self.game.join(user) {
            log::info!("user {id} joined room '{}'", self.game.name());
        }
        self.broadcast();
        Ok(())
    }

    /// Pushes a fresh view to every subscribed player. Best effort: a full
    /// channel drops this update, a closed channel drops the subscriber.
    fn broadcast(&mut self) {
        let mut disconnected = Vec::new();
        for id in self.game.player_ids() {
            let Some(sender) = self.subscribers.get(&id) else {
                continue;
            };
            match sender.try_send(self.game.view_for(id)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("push channel for user {id} full, dropping update");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    disconnected.push(id);
                }
            }
        }
        for id in disconnected {
            log::debug!("push subscriber {id} disconnected, removing");
            self.subscribers.remove(&id);
        }
    }
}
