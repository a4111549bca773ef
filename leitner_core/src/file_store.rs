//! File-backed card store with per-card locking.
//!
//! Directory layout:
//! ```text
//! <root>/
//! ├── cards/{id}.json   # one card per file
//! ├── locks/{id}.lock   # advisory lock serializing writers of one card
//! └── store.lock        # held while inserting, to keep words unique
//! ```
//!
//! Card files are only ever replaced by an atomic rename, so readers never
//! take a lock and never observe a half-written card.

use crate::store::{check_revision, CardStore};
use crate::{Card, Error, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Card store rooted at a data directory
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store under `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { root: root.into() };
        std::fs::create_dir_all(store.cards_dir())?;
        std::fs::create_dir_all(store.locks_dir())?;
        tracing::debug!("Opened card store at {:?}", store.root);
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn cards_dir(&self) -> PathBuf {
        self.root.join("cards")
    }

    fn locks_dir(&self) -> PathBuf {
        self.root.join("locks")
    }

    fn card_path(&self, id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", id))
    }

    fn card_lock_path(&self, id: Uuid) -> PathBuf {
        self.locks_dir().join(format!("{}.lock", id))
    }

    fn store_lock_path(&self) -> PathBuf {
        self.root.join("store.lock")
    }

    /// Run `f` while holding an exclusive lock on `lock_path`
    fn with_lock<T>(lock_path: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path)?;
        lock.lock_exclusive()?;

        let result = f();

        // Closing the file releases the lock regardless
        if let Err(e) = lock.unlock() {
            tracing::warn!("Failed to unlock {:?}: {}", lock_path, e);
        }
        result
    }

    /// Read one card file. Missing or unparsable files read as `None`.
    fn read_card(path: &Path) -> Result<Option<Card>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Card>(&contents) {
            Ok(card) => Ok(Some(card)),
            Err(e) => {
                tracing::warn!("Failed to parse card file {:?}: {}. Skipping.", path, e);
                Ok(None)
            }
        }
    }

    /// Atomically replace the card's file:
    /// 1. Write to a temp file in the same directory
    /// 2. Sync to disk
    /// 3. Rename over the original
    fn write_card(&self, card: &Card) -> Result<()> {
        let temp = NamedTempFile::new_in(self.cards_dir())?;

        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, card)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(self.card_path(card.id))
            .map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote card {} (revision {})", card.id, card.revision);
        Ok(())
    }
}

impl CardStore for FileStore {
    fn get_by_id(&self, id: Uuid) -> Result<Option<Card>> {
        Self::read_card(&self.card_path(id))
    }

    fn get_all(&self) -> Result<Vec<Card>> {
        let mut cards = Vec::new();

        for entry in std::fs::read_dir(self.cards_dir())? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(card) = Self::read_card(&path)? {
                cards.push(card);
            }
        }

        // Directory order is arbitrary; keep listings stable
        cards.sort_by(|a, b| a.created_time.cmp(&b.created_time).then(a.id.cmp(&b.id)));

        tracing::debug!("Read {} cards from {:?}", cards.len(), self.root);
        Ok(cards)
    }

    fn insert(&self, card: Card) -> Result<Card> {
        Self::with_lock(&self.store_lock_path(), || {
            let existing = self.get_all()?;
            if existing.iter().any(|c| c.word == card.word) {
                return Err(Error::Duplicate(card.word.clone()));
            }
            if self.card_path(card.id).exists() {
                return Err(Error::Store(format!("card id {} already in use", card.id)));
            }

            self.write_card(&card)?;
            Ok(card)
        })
    }

    fn update(&self, card: &Card) -> Result<()> {
        Self::with_lock(&self.card_lock_path(card.id), || {
            let stored = Self::read_card(&self.card_path(card.id))?
                .ok_or(Error::NotFound(card.id))?;
            check_revision(&stored, card)?;
            self.write_card(card)
        })
    }

    fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let lock_path = self.card_lock_path(id);
        let removed = Self::with_lock(&lock_path, || {
            match std::fs::remove_file(self.card_path(id)) {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })?;

        // Waiters on the old lock file find the card gone, so it can go too
        if let Err(e) = std::fs::remove_file(&lock_path) {
            tracing::debug!("Could not remove lock file {:?}: {}", lock_path, e);
        }

        Ok(removed)
    }
}
