#![forbid(unsafe_code)]

//! Core domain model and scheduling logic for the Leitner flashcard system.
//!
//! This crate provides:
//! - Domain types (cards, review status)
//! - Bin policy (intervals, eligibility, answer transitions)
//! - Card selection
//! - Card lifecycle operations
//! - Persistence (in-memory and file-backed stores, CSV transfer)

pub mod types;
pub mod error;
pub mod clock;
pub mod config;
pub mod logging;
pub mod policy;
pub mod scheduler;
pub mod store;
pub mod file_store;
pub mod lifecycle;
pub mod deck;
pub mod transfer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use store::{CardStore, MemoryStore};
pub use file_store::FileStore;
pub use deck::{AnswerOutcome, Deck};
pub use transfer::{export_csv, import_csv, ImportSummary};
