//! Bin policy: review intervals, eligibility, and answer transitions.
//!
//! Cards move through twelve bins:
//! - Bin 0 holds new words and is always eligible
//! - Bins 1-10 wait a fixed cooldown after the last review
//! - Bin 11 is mastered and never shown again
//!
//! A card with ten lifetime incorrect answers is retired as "hard to
//! remember" regardless of its bin.

use crate::Card;
use chrono::{DateTime, Duration, Utc};

/// Terminal bin; cards here are mastered
pub const MASTERED_BIN: u8 = 11;

/// Lifetime incorrect answers after which a card is retired
pub const MAX_INCORRECT: u32 = 10;

/// Cooldown in seconds for bins 0 through 10
const BIN_WAIT_SECONDS: [i64; MASTERED_BIN as usize] = [
    0, // always eligible
    5,
    25,
    2 * 60,
    10 * 60,
    60 * 60,
    5 * 60 * 60,
    86_400,
    5 * 86_400,
    25 * 86_400,
    16 * 7 * 86_400,
];

/// Minimum wait since the last review before a card in `bin` is due again.
///
/// Returns `None` for the mastered bin (and anything past it): those cards
/// are never due.
pub fn wait_for(bin: u8) -> Option<Duration> {
    BIN_WAIT_SECONDS
        .get(bin as usize)
        .map(|secs| Duration::seconds(*secs))
}

/// Whether a card is permanently out of rotation
pub fn is_exhausted(card: &Card) -> bool {
    card.bin >= MASTERED_BIN || card.num_times_incorrect >= MAX_INCORRECT
}

/// Whether a card may be reviewed at `now`.
///
/// The cooldown must be strictly exceeded: a card reviewed exactly one
/// interval ago is not yet eligible.
pub fn is_eligible(card: &Card, now: DateTime<Utc>) -> bool {
    if is_exhausted(card) {
        return false;
    }
    if card.bin == 0 {
        return true;
    }

    match wait_for(card.bin) {
        Some(wait) => now.signed_duration_since(card.last_read_time) > wait,
        None => false,
    }
}

/// When the card's cooldown ends, or `None` if it is exhausted.
///
/// A bin 0 card is due at this instant. Any other bin becomes eligible only
/// strictly after it.
pub fn next_due(card: &Card) -> Option<DateTime<Utc>> {
    if is_exhausted(card) {
        return None;
    }
    wait_for(card.bin).map(|wait| card.last_read_time + wait)
}

/// Apply an answer to a card.
///
/// Transition rules:
/// 1. Correct: move up one bin
/// 2. Incorrect: count the miss and drop back to bin 1 (never bin 0)
/// 3. Either way the review time becomes `now`
pub fn advance(card: &mut Card, was_correct: bool, now: DateTime<Utc>) {
    if was_correct {
        card.bin = card.bin.saturating_add(1).min(MASTERED_BIN);
    } else {
        card.num_times_incorrect = card.num_times_incorrect.saturating_add(1);
        card.bin = 1;
    }
    card.last_read_time = now;

    tracing::debug!(
        "Card {} answered {}: bin {}, {} misses",
        card.id,
        if was_correct { "correctly" } else { "incorrectly" },
        card.bin,
        card.num_times_incorrect
    );
}
