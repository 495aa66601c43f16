//! Data models for the review scheduler

use chrono::{NaiveDate, Utc, DateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest ease factor a record may carry
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Highest ease factor a record may carry
pub const MAX_EASE_FACTOR: f64 = 3.0;

/// Ease factor given to a newly seen item
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Highest SRS stage (long-interval mastery)
pub const MAX_SRS_LEVEL: u8 = 5;

/// Per-item learning state, computed by the scheduler and persisted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningRecord {
    pub item_id: Uuid,
    /// Progress stage, 0 (unseen/reset) to 5 (mastery)
    #[serde(default)]
    pub srs_level: u8,
    /// Interval multiplier beyond stage 4, kept within [1.3, 3.0]
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Correct answers in a row since the last miss
    #[serde(default)]
    pub consecutive_correct: u32,
    #[serde(default)]
    pub total_reviews: u32,
    /// Running mean of response latency in seconds
    #[serde(default)]
    pub average_response_time_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<NaiveDate>,
    /// Most recent self-reported confidence (1-5)
    #[serde(default = "default_confidence")]
    pub confidence_level: u8,
    /// Derived: srs_level >= 4 and consecutive_correct >= 3
    #[serde(default)]
    pub is_mastered: bool,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

fn default_confidence() -> u8 {
    1
}

impl LearningRecord {
    /// Fresh record for an item seen for the first time
    pub fn new(item_id: Uuid) -> Self {
        Self {
            item_id,
            srs_level: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            consecutive_correct: 0,
            total_reviews: 0,
            average_response_time_sec: 0.0,
            last_reviewed_date: None,
            next_review_date: None,
            confidence_level: default_confidence(),
            is_mastered: false,
        }
    }

    /// Check if the item should be shown on `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        if self.srs_level == 0 {
            return true;
        }
        match self.next_review_date {
            Some(next) => next <= today,
            None => true,
        }
    }
}

/// The answer a learner gave for one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub is_correct: bool,
    pub response_time_sec: f64,
    /// Self-reported confidence, 1-5
    pub confidence: u8,
}

impl Outcome {
    pub fn correct(response_time_sec: f64, confidence: u8) -> Self {
        Self {
            is_correct: true,
            response_time_sec,
            confidence,
        }
    }

    pub fn incorrect(response_time_sec: f64, confidence: u8) -> Self {
        Self {
            is_correct: false,
            response_time_sec,
            confidence,
        }
    }
}

/// A vocabulary entry as the scheduler's callers store it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: Uuid,
    pub term: String,
    pub meaning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Entered by the user rather than shipped with a catalog
    #[serde(default)]
    pub user_added: bool,
    /// Lifetime count of incorrect answers
    #[serde(default)]
    pub incorrect_count: u32,
    pub created_at: DateTime<Utc>,
}

impl VocabularyItem {
    pub fn new(term: String, meaning: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            term,
            meaning,
            example: None,
            user_added: true,
            incorrect_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Catalog entries get a stable id derived from the term
    pub fn from_catalog(term: String, meaning: String) -> Self {
        let mut item = Self::new(term, meaning);
        item.id = Uuid::new_v5(&Uuid::NAMESPACE_OID, item.term.as_bytes());
        item.user_added = false;
        item
    }

    /// Track a miss on the item itself; the learning record does not keep one
    pub fn record_answer(&mut self, is_correct: bool) {
        if !is_correct {
            self.incorrect_count += 1;
        }
    }
}

/// Counts over a collection of items, for the progress screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_items: usize,
    /// Level 0
    pub new_items: usize,
    /// Levels 1-3
    pub learning_items: usize,
    /// Level 4 and above
    pub mature_items: usize,
    pub mastered_items: usize,
    pub due_items: usize,
}
