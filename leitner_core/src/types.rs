//! Core domain types for the Leitner flashcard system.
//!
//! This module defines:
//! - Cards and their review progress
//! - Derived review status used for "done for now" messaging

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Card
// ============================================================================

/// A word/definition pair and its position in the review schedule
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: Uuid,
    pub word: String,
    pub definition: String,
    /// Review level, 0 (new) through 11 (mastered)
    pub bin: u8,
    /// Lifetime count of incorrect answers
    pub num_times_incorrect: u32,
    pub created_time: DateTime<Utc>,
    pub last_read_time: DateTime<Utc>,
    /// Bumped on every persisted update; stores use it for compare-and-swap
    #[serde(default)]
    pub revision: u64,
}

impl Card {
    /// Build a brand-new card in bin 0 with both timestamps set to `now`
    pub fn new(word: impl Into<String>, definition: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            word: word.into(),
            definition: definition.into(),
            bin: 0,
            num_times_incorrect: 0,
            created_time: now,
            last_read_time: now,
            revision: 0,
        }
    }
}

// ============================================================================
// Review status
// ============================================================================

/// What the reviewer should be told when asking for the next card
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewStatus {
    /// A card is due now
    Ready(Card),
    /// Nothing is due, but some cards will come back later
    TemporarilyDone { next_due: Option<DateTime<Utc>> },
    /// Every card is mastered or has been retired as too hard
    PermanentlyDone,
    /// The store holds no cards at all
    Empty,
}
