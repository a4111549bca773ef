//! Card selection.
//!
//! Selection rules:
//! - Only eligible cards are candidates (see [`crate::policy::is_eligible`])
//! - Among candidates, the highest bin wins, so due reviews of well-known
//!   words come before new words from bin 0
//! - Ties within a bin are broken arbitrarily

use crate::policy;
use crate::{Card, ReviewStatus};
use chrono::{DateTime, Utc};

/// Pick the card to show next, if any is due
pub fn select_card(cards: &[Card], now: DateTime<Utc>) -> Option<&Card> {
    let selected = cards
        .iter()
        .filter(|card| policy::is_eligible(card, now))
        .max_by_key(|card| card.bin);

    match selected {
        Some(card) => tracing::debug!("Selected card {} from bin {}", card.id, card.bin),
        None => tracing::debug!("No eligible cards among {}", cards.len()),
    }

    selected
}

/// Every card, unfiltered, in store order
pub fn select_all(cards: &[Card]) -> Vec<Card> {
    cards.to_vec()
}

/// Work out what to tell the reviewer at `now`
pub fn review_status(cards: &[Card], now: DateTime<Utc>) -> ReviewStatus {
    if cards.is_empty() {
        return ReviewStatus::Empty;
    }

    if let Some(card) = select_card(cards, now) {
        return ReviewStatus::Ready(card.clone());
    }

    let mut active = cards.iter().filter(|card| !policy::is_exhausted(card)).peekable();
    if active.peek().is_none() {
        tracing::info!("All {} cards are mastered or retired", cards.len());
        return ReviewStatus::PermanentlyDone;
    }

    let next_due = active.filter_map(policy::next_due).min();
    ReviewStatus::TemporarilyDone { next_due }
}
