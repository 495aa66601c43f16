//! Adaptive review scheduler
//!
//! This module provides:
//! - Learning records and vocabulary item models
//! - Outcome application and the staged interval function
//! - Due-set selection and progress counts
//! - A record store interface with a JSON file implementation

pub mod algorithm;
pub mod models;
pub mod selection;
pub mod storage;

use thiserror::Error;

pub use algorithm::{apply_outcome, format_interval, is_mastered, next_review_date, preview_intervals};
pub use models::*;
pub use selection::{due_queue, review_stats, select_due, select_due_with_rng, Reviewable};
pub use storage::{FileRecordStore, RecordStore, StorageError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    /// The caller passed data the scheduler will not guess about
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ReviewError>;

/// Record for an item seen for the first time
pub fn default_record(item_id: uuid::Uuid) -> LearningRecord {
    LearningRecord::new(item_id)
}
