// src/progress/mod.rs

//! Persisted glossary XP ledger.

pub mod locks;
pub mod store;
pub mod tracker;

pub use locks::LearnerLocks;
pub use store::{MemoryStore, ProgressStore, SqliteStore, StoreError};
pub use tracker::{Credit, InteractionKey, ProgressState, ProgressTracker};
