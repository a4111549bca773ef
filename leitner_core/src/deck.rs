//! The operations offered to a request layer.
//!
//! A [`Deck`] owns a card store and a clock and exposes the review workflow:
//! fetch the next card, answer it, and manage the card set.

use crate::clock::{Clock, SystemClock};
use crate::store::CardStore;
use crate::{lifecycle, scheduler, Card, Error, Result, ReviewStatus};
use uuid::Uuid;

/// Result of a recorded answer
#[derive(Clone, Debug, PartialEq)]
pub struct AnswerOutcome {
    /// The card as stored after the answer
    pub answered: Card,
    /// The card to review next, if any is due
    pub next: Option<Card>,
}

/// A reviewable set of cards
pub struct Deck<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: CardStore> Deck<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CardStore, C: Clock> Deck<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The highest-priority card due now, if any
    pub fn fetch_next_card(&self) -> Result<Option<Card>> {
        let cards = self.store.get_all().map_err(log_store_error)?;
        Ok(scheduler::select_card(&cards, self.clock.now()).cloned())
    }

    pub fn list_all_cards(&self) -> Result<Vec<Card>> {
        let cards = self.store.get_all().map_err(log_store_error)?;
        Ok(scheduler::select_all(&cards))
    }

    pub fn create_card(&self, word: &str, definition: &str) -> Result<Card> {
        lifecycle::create_card(&self.store, word, definition, self.clock.now())
            .map_err(log_store_error)
    }

    /// Record an answer and serve the next card.
    ///
    /// An answer for a card that is not currently due is rejected with
    /// [`Error::Ineligible`]. On success the outcome carries the updated card
    /// and the next card due, which is `None` once the queue is drained.
    pub fn submit_answer(&self, id: Uuid, was_correct: bool) -> Result<AnswerOutcome> {
        let answered = lifecycle::record_answer(&self.store, id, was_correct, self.clock.now())
            .map_err(log_store_error)?;
        let next = self.fetch_next_card()?;
        Ok(AnswerOutcome { answered, next })
    }

    pub fn delete_card(&self, id: Uuid) -> Result<bool> {
        lifecycle::delete_card(&self.store, id).map_err(log_store_error)
    }

    /// What to tell the reviewer right now
    pub fn review_status(&self) -> Result<ReviewStatus> {
        let cards = self.store.get_all().map_err(log_store_error)?;
        Ok(scheduler::review_status(&cards, self.clock.now()))
    }
}

/// Log failures of the store itself; request rejections pass through quietly
fn log_store_error(e: Error) -> Error {
    if !e.is_recoverable() {
        tracing::error!("Card store failure: {}", e);
    }
    e
}
