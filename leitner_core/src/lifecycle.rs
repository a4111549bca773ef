//! Card lifecycle: creation, answers, and deletion.
//!
//! Every operation takes the store handle explicitly and re-reads fresh state;
//! nothing is cached between calls.

use crate::policy;
use crate::store::CardStore;
use crate::{Card, Error, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Longest accepted word, in characters
pub const MAX_WORD_LEN: usize = 100;

/// Longest accepted definition, in characters
pub const MAX_DEFINITION_LEN: usize = 450;

/// How many times to re-read a card that changed under us
const MAX_ANSWER_ATTEMPTS: usize = 3;

fn validate_field(name: &str, value: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", name)));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(Error::Validation(format!(
            "{} is {} characters long (max {})",
            name, len, max_len
        )));
    }
    Ok(())
}

/// Create a new card in bin 0
pub fn create_card<S: CardStore + ?Sized>(
    store: &S,
    word: &str,
    definition: &str,
    now: DateTime<Utc>,
) -> Result<Card> {
    validate_field("word", word, MAX_WORD_LEN)?;
    validate_field("definition", definition, MAX_DEFINITION_LEN)?;

    let card = store.insert(Card::new(word, definition, now))?;
    tracing::info!("Created card {} for {:?}", card.id, card.word);
    Ok(card)
}

/// Record a review answer for a card.
///
/// The card must be eligible at `now`; otherwise the answer is rejected with
/// [`Error::Ineligible`] and nothing changes. If another answer for the same
/// card lands between our read and write, the card is re-read and
/// re-validated, which rejects the late answer since the winner reset the
/// cooldown.
pub fn record_answer<S: CardStore + ?Sized>(
    store: &S,
    id: Uuid,
    was_correct: bool,
    now: DateTime<Utc>,
) -> Result<Card> {
    for attempt in 1..=MAX_ANSWER_ATTEMPTS {
        let mut card = store.get_by_id(id)?.ok_or(Error::NotFound(id))?;

        if !policy::is_eligible(&card, now) {
            tracing::warn!(
                "Rejected answer for card {} (bin {}, {} misses): not due",
                id,
                card.bin,
                card.num_times_incorrect
            );
            return Err(Error::Ineligible(id));
        }

        policy::advance(&mut card, was_correct, now);
        card.revision += 1;

        match store.update(&card) {
            Ok(()) => {
                if policy::is_exhausted(&card) {
                    tracing::info!("Card {} retired at bin {}", id, card.bin);
                }
                tracing::info!(
                    "Recorded {} answer for card {}: now bin {}",
                    if was_correct { "correct" } else { "incorrect" },
                    id,
                    card.bin
                );
                return Ok(card);
            }
            Err(Error::Conflict(_)) => {
                tracing::debug!("Card {} changed during answer (attempt {})", id, attempt);
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::Conflict(id))
}

/// Delete a card. Returns false if it did not exist.
pub fn delete_card<S: CardStore + ?Sized>(store: &S, id: Uuid) -> Result<bool> {
    let deleted = store.delete_by_id(id)?;
    if deleted {
        tracing::info!("Deleted card {}", id);
    } else {
        tracing::debug!("Delete of unknown card {}", id);
    }
    Ok(deleted)
}
