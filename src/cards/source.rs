//! Card source collaborator.
//!
//! Rooms are created from a pool of already-loaded cards; where those
//! cards come from (a database, files, a remote pack registry) is the
//! embedding application's business. `CardSource` is the seam it plugs
//! into.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use super::{CardpackId, PromptCard, ResponseCard};

/// Card loading errors.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CardSourceError {
    /// One of the requested cardpack ids does not exist.
    #[error("unknown cardpack id: {0}")]
    UnknownCardpack(CardpackId),

    /// The backing store failed.
    #[error("card source failure: {0}")]
    Backend(String),
}

/// Provider of card decks, keyed by cardpack.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Loads all prompt and response cards belonging to the given
    /// cardpacks. Fails if any id is invalid.
    async fn load_cards(
        &self,
        cardpack_ids: &[CardpackId],
    ) -> Result<(Vec<PromptCard>, Vec<ResponseCard>), CardSourceError>;
}

/// In-memory card source backed by fixed cardpacks.
#[derive(Debug, Default)]
pub struct FixedCardSource {
    packs: HashMap<CardpackId, (Vec<PromptCard>, Vec<ResponseCard>)>,
}

impl FixedCardSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_pack(
        &mut self,
        id: CardpackId,
        prompts: Vec<PromptCard>,
        responses: Vec<ResponseCard>,
    ) {
        self.packs.insert(id, (prompts, responses));
    }
}

#[async_trait]
impl CardSource for FixedCardSource {
    async fn load_cards(
        &self,
        cardpack_ids: &[CardpackId],
    ) -> Result<(Vec<PromptCard>, Vec<ResponseCard>), CardSourceError> {
        let mut prompts = Vec::new();
        let mut responses = Vec::new();
        for id in cardpack_ids {
            let (p, r) = self
                .packs
                .get(id)
                .ok_or(CardSourceError::UnknownCardpack(*id))?;
            prompts.extend(p.iter().cloned());
            responses.extend(r.iter().cloned());
        }
        Ok((prompts, responses))
    }
}
