//! CSV export and import of cards.
//!
//! Export writes the full card listing, one row per card. Import reads the
//! `word` and `definition` columns of any CSV with a header row (so an export
//! can be fed back in) and creates fresh cards from them.

use crate::clock::Clock;
use crate::deck::Deck;
use crate::store::CardStore;
use crate::{Card, Result};
use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A row in the exported CSV
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: String,
    word: &'a str,
    definition: &'a str,
    bin: u8,
    num_times_incorrect: u32,
    created_time: String,
    last_read_time: String,
}

impl<'a> From<&'a Card> for ExportRow<'a> {
    fn from(card: &'a Card) -> Self {
        ExportRow {
            id: card.id.to_string(),
            word: &card.word,
            definition: &card.definition,
            bin: card.bin,
            num_times_incorrect: card.num_times_incorrect,
            created_time: card.created_time.to_rfc3339(),
            last_read_time: card.last_read_time.to_rfc3339(),
        }
    }
}

/// The columns import cares about; anything else in the file is ignored
#[derive(Debug, Deserialize)]
struct ImportRow {
    word: String,
    definition: String,
}

/// Outcome of an import
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    /// Rows that were malformed, invalid, or duplicated an existing word
    pub skipped: usize,
}

/// Write every card to `path`, replacing any existing file.
///
/// Returns the number of cards written.
pub fn export_csv(cards: &[Card], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = Writer::from_path(path)?;
    for card in cards {
        writer.serialize(ExportRow::from(card))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} cards to {:?}", cards.len(), path);
    Ok(cards.len())
}

/// Create cards from the rows of a CSV file
pub fn import_csv<S: CardStore, C: Clock>(deck: &Deck<S, C>, path: &Path) -> Result<ImportSummary> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut summary = ImportSummary::default();
    for (index, result) in reader.deserialize::<ImportRow>().enumerate() {
        // Header is line 1
        let line = index + 2;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping malformed CSV line {}: {}", line, e);
                summary.skipped += 1;
                continue;
            }
        };

        match deck.create_card(&row.word, &row.definition) {
            Ok(_) => summary.created += 1,
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Skipping CSV line {}: {}", line, e);
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Imported {} cards from {:?} ({} skipped)",
        summary.created,
        path,
        summary.skipped
    );
    Ok(summary)
}
