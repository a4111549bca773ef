//! Card store abstraction.
//!
//! Stores are the only shared mutable state in the system. Updates are
//! compare-and-swap on [`Card::revision`]: a write is accepted only when the
//! incoming card's revision is exactly one past the stored one, so two
//! writers that read the same card cannot both succeed.

use crate::{Card, Error, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Persistence for cards
pub trait CardStore: Send + Sync {
    fn get_by_id(&self, id: Uuid) -> Result<Option<Card>>;

    fn get_all(&self) -> Result<Vec<Card>>;

    /// Fails with [`Error::Duplicate`] if another card already has this word
    fn insert(&self, card: Card) -> Result<Card>;

    /// Fails with [`Error::NotFound`] if the card is gone and with
    /// [`Error::Conflict`] if it changed since it was read
    fn update(&self, card: &Card) -> Result<()>;

    /// Returns false if there was nothing to delete
    fn delete_by_id(&self, id: Uuid) -> Result<bool>;
}

/// Check that `incoming` is the direct successor of `stored`
pub(crate) fn check_revision(stored: &Card, incoming: &Card) -> Result<()> {
    if stored.revision.checked_add(1) != Some(incoming.revision) {
        tracing::debug!(
            "Revision mismatch for card {}: stored {}, incoming {}",
            incoming.id,
            stored.revision,
            incoming.revision
        );
        return Err(Error::Conflict(incoming.id));
    }
    Ok(())
}

/// In-process card store
#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: Mutex<Vec<Card>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn cards(&self) -> Result<MutexGuard<'_, Vec<Card>>> {
        self.cards
            .lock()
            .map_err(|_| Error::Store("memory store lock poisoned".into()))
    }
}

impl CardStore for MemoryStore {
    fn get_by_id(&self, id: Uuid) -> Result<Option<Card>> {
        Ok(self.cards()?.iter().find(|c| c.id == id).cloned())
    }

    fn get_all(&self) -> Result<Vec<Card>> {
        Ok(self.cards()?.clone())
    }

    fn insert(&self, card: Card) -> Result<Card> {
        let mut cards = self.cards()?;
        if cards.iter().any(|c| c.word == card.word) {
            return Err(Error::Duplicate(card.word));
        }
        if cards.iter().any(|c| c.id == card.id) {
            return Err(Error::Store(format!("card id {} already in use", card.id)));
        }
        cards.push(card.clone());
        Ok(card)
    }

    fn update(&self, card: &Card) -> Result<()> {
        let mut cards = self.cards()?;
        let stored = cards
            .iter_mut()
            .find(|c| c.id == card.id)
            .ok_or(Error::NotFound(card.id))?;
        check_revision(stored, card)?;
        *stored = card.clone();
        Ok(())
    }

    fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut cards = self.cards()?;
        let before = cards.len();
        cards.retain(|c| c.id != id);
        Ok(cards.len() != before)
    }
}
