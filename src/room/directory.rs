//! Room directory: name-to-room and user-to-room resolution.
//!
//! The directory owns the room-level invariants: names are unique, a user
//! belongs to at most one room, and a room whose roster empties is
//! deleted. Everything per-room is delegated to that room's actor.

use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{
    actor::{RoomActor, RoomHandle},
    config::RoomConfig,
    errors::RoomError,
};
use crate::cards::{CardId, PromptCard, ResponseCard};
use crate::game::{Game, RoomSummary, User, UserId, UserView};

/// Directory of active rooms.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: RwLock<HashMap<String, RoomHandle>>,
    memberships: RwLock<HashMap<UserId, String>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a room and seats the creator as its first player (and thus
    /// owner). The creator leaves any prior room first.
    pub async fn create_room(
        &self,
        user: User,
        config: RoomConfig,
        prompt_cards: Vec<PromptCard>,
        response_cards: Vec<ResponseCard>,
    ) -> Result<(), RoomError> {
        // Validate everything before touching the creator's current
        // membership, so a failed create changes nothing.
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&config.name) {
            return Err(RoomError::NameTaken);
        }

        let name = config.name.clone();
        let game = Game::new(config, prompt_cards, response_cards)?;
        let (actor, handle) = RoomActor::new(game);
        tokio::spawn(actor.run());

        // Seating the creator in a freshly spawned empty room cannot be
        // rejected for capacity. The membership lock is held until the
        // map points at the new room, so a concurrent switch by the same
        // user cannot interleave and strand a roster entry.
        let mut memberships = self.memberships.write().await;
        handle.join(user.clone()).await?;
        rooms.insert(name.clone(), handle);
        let previous = memberships.insert(user.id, name.clone());
        drop(memberships);
        drop(rooms);

        if let Some(old_room) = previous {
            self.depart(user.id, &old_room).await;
        }
        log::info!("created room '{name}' for user {}", user.id);
        Ok(())
    }

    /// Adds a user to an existing room, leaving any previous room first.
    pub async fn join_room(&self, user: User, room_name: &str) -> Result<(), RoomError> {
        let handle = self
            .handle_by_name(room_name)
            .await
            .ok_or(RoomError::GameNotFound)?;

        // The membership lock is held from the staleness check until the
        // map points at the new room, serializing concurrent switches by
        // the same user. Joining the new room before leaving the old one
        // means a refused join (room full) never costs the user their
        // current seat.
        let mut memberships = self.memberships.write().await;
        if memberships.get(&user.id).map(String::as_str) == Some(room_name) {
            return Err(RoomError::AlreadyInGame);
        }
        handle.join(user.clone()).await?;
        let previous = memberships.insert(user.id, room_name.to_string());
        drop(memberships);

        if let Some(old_room) = previous {
            self.depart(user.id, &old_room).await;
        }
        Ok(())
    }

    /// Removes a user from whatever room they are in. Deletes the room if
    /// it empties. A user in no room is a no-op.
    pub async fn leave_room(&self, user_id: UserId) {
        let Some(name) = self.memberships.write().await.remove(&user_id) else {
            return;
        };
        self.depart(user_id, &name).await;
    }

    /// Takes a user off a room's roster, deleting the room if it empties.
    /// Membership bookkeeping is the caller's responsibility.
    async fn depart(&self, user_id: UserId, name: &str) {
        let Some(handle) = self.handle_by_name(name).await else {
            return;
        };
        match handle.leave(user_id).await {
            Ok(reply) if reply.remaining == 0 => {
                let mut rooms = self.rooms.write().await;
                rooms.remove(name);
                drop(rooms);
                handle.close().await;
                log::info!("room '{name}' emptied, deleting");
            }
            Ok(_) => {}
            Err(e) => log::warn!("leave for user {user_id} in room '{name}' failed: {e}"),
        }
    }

    /// Owner kicks another player from the owner's room.
    pub async fn kick_user(&self, owner_id: UserId, target_id: UserId) -> Result<(), RoomError> {
        let handle = self.handle_for_user(owner_id).await?;
        // Held across the actor call so the target cannot switch rooms
        // between the roster removal and the membership removal.
        let mut memberships = self.memberships.write().await;
        handle.kick(owner_id, target_id).await?;
        if memberships.get(&target_id).map(String::as_str) == Some(handle.name()) {
            memberships.remove(&target_id);
        }
        Ok(())
    }

    /// Starts the game in the caller's room.
    pub async fn start_game(&self, user_id: UserId) -> Result<(), RoomError> {
        self.handle_for_user(user_id).await?.start(user_id).await
    }

    /// Stops the game in the caller's room.
    pub async fn stop_game(&self, user_id: UserId) -> Result<(), RoomError> {
        self.handle_for_user(user_id).await?.stop(user_id).await
    }

    /// Plays a card in the caller's room.
    pub async fn play_card(&self, user_id: UserId, card_id: CardId) -> Result<(), RoomError> {
        self.handle_for_user(user_id)
            .await?
            .play_card(user_id, card_id)
            .await
    }

    /// Votes for a card in the caller's room.
    pub async fn vote_card(&self, user_id: UserId, card_id: CardId) -> Result<(), RoomError> {
        self.handle_for_user(user_id)
            .await?
            .vote_card(user_id, card_id)
            .await
    }

    /// The room state from one user's perspective, or `None` when they
    /// are not in any room.
    pub async fn state_for_user(&self, user_id: UserId) -> Option<UserView> {
        let handle = self.handle_for_user(user_id).await.ok()?;
        handle.view(user_id).await.ok()
    }

    /// Registers a state-push channel for a user in their current room.
    pub async fn subscribe(
        &self,
        user_id: UserId,
    ) -> Result<tokio::sync::mpsc::Receiver<UserView>, RoomError> {
        self.handle_for_user(user_id).await?.subscribe(user_id).await
    }

    /// Lobby listing of every active room.
    pub async fn room_list(&self) -> Vec<RoomSummary> {
        let handles: Vec<RoomHandle> = {
            let rooms = self.rooms.read().await;
            rooms.values().cloned().collect()
        };
        let mut list = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(summary) = handle.summary().await {
                list.push(summary);
            }
        }
        list
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    async fn handle_by_name(&self, name: &str) -> Option<RoomHandle> {
        self.rooms.read().await.get(name).cloned()
    }

    async fn handle_for_user(&self, user_id: UserId) -> Result<RoomHandle, RoomError> {
        let name = {
            let memberships = self.memberships.read().await;
            memberships.get(&user_id).cloned()
        }
        .ok_or(RoomError::NotInGame)?;
        self.handle_by_name(&name).await.ok_or(RoomError::NotInGame)
    }
}
