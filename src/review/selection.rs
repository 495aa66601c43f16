//! Due-set selection
//!
//! Items are due when their record is at stage 0, has no next review date,
//! or the date has arrived. Due items are ordered so struggling and stale
//! material comes first:
//! 1. more historical misses first
//! 2. earlier last review first (never reviewed before any date)
//! 3. user-added before catalog items
//!
//! `select_due` shuffles within runs of equal priority before taking the
//! daily slice, so repeated sessions do not always open on the same item.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::models::{LearningRecord, ReviewStats, VocabularyItem};

/// What the scheduler needs to know about an item to order it
pub trait Reviewable {
    fn item_id(&self) -> Uuid;
    fn incorrect_count(&self) -> u32;
    fn is_user_added(&self) -> bool;
}

impl Reviewable for VocabularyItem {
    fn item_id(&self) -> Uuid {
        self.id
    }

    fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    fn is_user_added(&self) -> bool {
        self.user_added
    }
}

/// Ordering key; two items with equal keys share a band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriorityKey {
    incorrect_count: u32,
    last_reviewed: Option<NaiveDate>,
    user_added: bool,
}

impl PriorityKey {
    fn of<T: Reviewable>(item: &T, record: Option<&LearningRecord>) -> Self {
        Self {
            incorrect_count: item.incorrect_count(),
            last_reviewed: record.and_then(|r| r.last_reviewed_date),
            user_added: item.is_user_added(),
        }
    }

    /// `Less` means "review first"
    fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .incorrect_count
            .cmp(&self.incorrect_count)
            // None < Some(_), so never-reviewed items lead
            .then_with(|| self.last_reviewed.cmp(&other.last_reviewed))
            .then_with(|| other.user_added.cmp(&self.user_added))
    }
}

fn is_due(record: Option<&LearningRecord>, today: NaiveDate) -> bool {
    // Items without a record have never been seen: default record, stage 0
    record.map_or(true, |r| r.is_due(today))
}

fn due_with_keys<'a, T: Reviewable>(
    items: &'a [T],
    records: &HashMap<Uuid, LearningRecord>,
    today: NaiveDate,
) -> Vec<(&'a T, PriorityKey)> {
    let mut due: Vec<(&T, PriorityKey)> = items
        .iter()
        .filter_map(|item| {
            let record = records.get(&item.item_id());
            is_due(record, today).then(|| (item, PriorityKey::of(item, record)))
        })
        .collect();

    // sort_by is stable: equal keys keep caller order
    due.sort_by(|a, b| a.1.priority_cmp(&b.1));
    due
}

/// Every due item in deterministic priority order
pub fn due_queue<'a, T: Reviewable>(
    items: &'a [T],
    records: &HashMap<Uuid, LearningRecord>,
    today: NaiveDate,
) -> Vec<&'a T> {
    due_with_keys(items, records, today)
        .into_iter()
        .map(|(item, _)| item)
        .collect()
}

/// Today's review slice: at most `limit` due items, shuffled within bands
pub fn select_due<'a, T: Reviewable>(
    items: &'a [T],
    records: &HashMap<Uuid, LearningRecord>,
    today: NaiveDate,
    limit: usize,
) -> Vec<&'a T> {
    select_due_with_rng(items, records, today, limit, &mut rand::thread_rng())
}

/// Same as [`select_due`] with a caller-supplied random source
pub fn select_due_with_rng<'a, T: Reviewable, R: Rng + ?Sized>(
    items: &'a [T],
    records: &HashMap<Uuid, LearningRecord>,
    today: NaiveDate,
    limit: usize,
    rng: &mut R,
) -> Vec<&'a T> {
    let mut due = due_with_keys(items, records, today);

    let mut start = 0;
    while start < due.len() {
        let key = due[start].1;
        let end = due[start..]
            .iter()
            .position(|(_, k)| *k != key)
            .map_or(due.len(), |offset| start + offset);
        due[start..end].shuffle(rng);
        start = end;
    }

    log::debug!("{} items due on {}, taking up to {}", due.len(), today, limit);

    due.into_iter().take(limit).map(|(item, _)| item).collect()
}

/// Progress counts for a collection of items
pub fn review_stats<T: Reviewable>(
    items: &[T],
    records: &HashMap<Uuid, LearningRecord>,
    today: NaiveDate,
) -> ReviewStats {
    let mut stats = ReviewStats {
        total_items: items.len(),
        ..ReviewStats::default()
    };

    for item in items {
        let record = records.get(&item.item_id());
        match record.map_or(0, |r| r.srs_level) {
            0 => stats.new_items += 1,
            1..=3 => stats.learning_items += 1,
            _ => stats.mature_items += 1,
        }
        if record.is_some_and(|r| r.is_mastered) {
            stats.mastered_items += 1;
        }
        if is_due(record, today) {
            stats.due_items += 1;
        }
    }

    stats
}
