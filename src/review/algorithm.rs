//! Staged spaced repetition
//!
//! Stages 0-4 use a fixed interval table; from stage 5 on the interval is
//! `round(14 * ease_factor)` days, so the ease factor tuned by response
//! speed and confidence personalizes long-term spacing.
//!
//! Promotion needs two correct answers in a row. A miss demotes one stage
//! and costs 0.2 ease.

use chrono::{Duration, NaiveDate};

use super::models::{
    LearningRecord, Outcome, MAX_EASE_FACTOR, MAX_SRS_LEVEL, MIN_EASE_FACTOR,
};
use super::{ReviewError, Result};

/// Interval in days for stages 0-4
const FIXED_INTERVALS: [i64; 5] = [0, 1, 3, 7, 14];

/// Base interval that the ease factor scales at stage 5
const MASTERY_BASE_DAYS: f64 = 14.0;

/// Ease reward for a fast, confident correct answer
const EASE_BONUS: f64 = 0.1;

/// Ease penalty for a miss
const EASE_PENALTY: f64 = 0.2;

/// Answers faster than this (seconds) count as fluent
const FAST_RESPONSE_SECS: f64 = 5.0;

/// Correct answers in a row needed before a stage promotion
const PROMOTION_STREAK: u32 = 2;

/// Interval in days for a stage and ease factor
pub fn interval_days(srs_level: u8, ease_factor: f64) -> i64 {
    match FIXED_INTERVALS.get(srs_level as usize) {
        Some(days) => *days,
        None => (MASTERY_BASE_DAYS * ease_factor).round() as i64,
    }
}

/// Date on or after which an item at this stage is due again.
///
/// Fails when the date would fall past the end of the calendar.
pub fn next_review_date(srs_level: u8, ease_factor: f64, today: NaiveDate) -> Result<NaiveDate> {
    let days = interval_days(srs_level, ease_factor);
    today
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| {
            ReviewError::InvalidInput(format!("{} plus {} days is out of the date range", today, days))
        })
}

/// Mastery is derived, never stored independently
pub fn is_mastered(srs_level: u8, consecutive_correct: u32) -> bool {
    srs_level >= 4 && consecutive_correct >= 3
}

/// Apply one answer to a record and return the updated record.
///
/// Rejects confidence outside 1-5, a negative or non-finite response time,
/// and records whose level or ease are already out of range.
pub fn apply_outcome(
    record: &LearningRecord,
    outcome: Outcome,
    today: NaiveDate,
) -> Result<LearningRecord> {
    validate(record, &outcome)?;

    let mut next = record.clone();

    if outcome.is_correct {
        next.consecutive_correct += 1;
        if next.consecutive_correct >= PROMOTION_STREAK && next.srs_level < MAX_SRS_LEVEL {
            next.srs_level += 1;
        }

        if outcome.confidence >= 4 && outcome.response_time_sec < FAST_RESPONSE_SECS {
            next.ease_factor = (next.ease_factor + EASE_BONUS).min(MAX_EASE_FACTOR);
        } else if outcome.confidence >= 3 {
            // Floor only, no reward
            next.ease_factor = next.ease_factor.max(MIN_EASE_FACTOR);
        }
    } else {
        next.consecutive_correct = 0;
        next.srs_level = next.srs_level.saturating_sub(1);
        next.ease_factor = (next.ease_factor - EASE_PENALTY).max(MIN_EASE_FACTOR);
    }

    let samples = f64::from(record.total_reviews);
    next.average_response_time_sec =
        (record.average_response_time_sec * samples + outcome.response_time_sec) / (samples + 1.0);
    next.total_reviews += 1;
    next.last_reviewed_date = Some(today);
    next.confidence_level = outcome.confidence;
    next.next_review_date = Some(next_review_date(next.srs_level, next.ease_factor, today)?);
    next.is_mastered = is_mastered(next.srs_level, next.consecutive_correct);

    Ok(next)
}

fn validate(record: &LearningRecord, outcome: &Outcome) -> Result<()> {
    if !(1..=5).contains(&outcome.confidence) {
        return Err(ReviewError::InvalidInput(format!(
            "confidence must be 1-5, got {}",
            outcome.confidence
        )));
    }
    if !outcome.response_time_sec.is_finite() || outcome.response_time_sec < 0.0 {
        return Err(ReviewError::InvalidInput(format!(
            "response time must be a non-negative number of seconds, got {}",
            outcome.response_time_sec
        )));
    }
    if record.srs_level > MAX_SRS_LEVEL {
        return Err(ReviewError::InvalidInput(format!(
            "record {} has srs level {} (max {})",
            record.item_id, record.srs_level, MAX_SRS_LEVEL
        )));
    }
    if !(MIN_EASE_FACTOR..=MAX_EASE_FACTOR).contains(&record.ease_factor) {
        return Err(ReviewError::InvalidInput(format!(
            "record {} has ease factor {} outside [{}, {}]",
            record.item_id, record.ease_factor, MIN_EASE_FACTOR, MAX_EASE_FACTOR
        )));
    }
    Ok(())
}

/// Intervals an item would get for a correct and for an incorrect answer.
/// Used to show learners what each answer does before they give it.
pub fn preview_intervals(record: &LearningRecord) -> [i64; 2] {
    let correct_level = if record.consecutive_correct + 1 >= PROMOTION_STREAK {
        (record.srs_level + 1).min(MAX_SRS_LEVEL)
    } else {
        record.srs_level
    };
    let incorrect_level = record.srs_level.saturating_sub(1);
    let incorrect_ease = (record.ease_factor - EASE_PENALTY).max(MIN_EASE_FACTOR);

    [
        interval_days(correct_level, record.ease_factor),
        interval_days(incorrect_level, incorrect_ease),
    ]
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: i64) -> String {
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record_at(level: u8, streak: u32) -> LearningRecord {
        let mut record = LearningRecord::new(Uuid::new_v4());
        record.srs_level = level;
        record.consecutive_correct = streak;
        record
    }

    #[test]
    fn test_first_correct_does_not_promote() {
        let today = day(2026, 5, 10);
        let record = LearningRecord::new(Uuid::new_v4());

        let first = apply_outcome(&record, Outcome::correct(3.0, 3), today).unwrap();
        assert_eq!(first.consecutive_correct, 1);
        assert_eq!(first.srs_level, 0);

        let second = apply_outcome(&first, Outcome::correct(3.0, 3), today).unwrap();
        assert_eq!(second.consecutive_correct, 2);
        assert_eq!(second.srs_level, 1);
    }

    #[test]
    fn test_miss_demotes_one_stage() {
        let record = record_at(3, 4);
        let result = apply_outcome(&record, Outcome::incorrect(8.0, 2), day(2026, 5, 10)).unwrap();

        assert_eq!(result.srs_level, 2);
        assert_eq!(result.consecutive_correct, 0);
        assert!((result.ease_factor - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_miss_at_level_zero_still_costs_ease() {
        let record = LearningRecord::new(Uuid::new_v4());
        let result = apply_outcome(&record, Outcome::incorrect(2.0, 1), day(2026, 5, 10)).unwrap();

        assert_eq!(result.srs_level, 0);
        assert!((result.ease_factor - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_fast_confident_answer_raises_ease() {
        let record = record_at(2, 1);
        let result = apply_outcome(&record, Outcome::correct(2.5, 4), day(2026, 5, 10)).unwrap();
        assert!((result.ease_factor - 2.6).abs() < 1e-9);

        let slow = apply_outcome(&record, Outcome::correct(6.0, 5), day(2026, 5, 10)).unwrap();
        assert_eq!(slow.ease_factor, 2.5);
    }

    #[test]
    fn test_ease_stays_in_range() {
        let today = day(2026, 5, 10);
        let mut record = LearningRecord::new(Uuid::new_v4());
        for _ in 0..20 {
            record = apply_outcome(&record, Outcome::correct(1.0, 5), today).unwrap();
            assert!(record.ease_factor <= MAX_EASE_FACTOR);
            assert!(record.srs_level <= MAX_SRS_LEVEL);
        }
        assert_eq!(record.ease_factor, MAX_EASE_FACTOR);

        for _ in 0..20 {
            record = apply_outcome(&record, Outcome::incorrect(9.0, 1), today).unwrap();
            assert!(record.ease_factor >= MIN_EASE_FACTOR);
        }
        assert_eq!(record.ease_factor, MIN_EASE_FACTOR);
        assert_eq!(record.srs_level, 0);
    }

    #[test]
    fn test_interval_table() {
        let today = day(2026, 5, 10);

        assert_eq!(next_review_date(0, 2.5, today), Ok(today));
        assert_eq!(next_review_date(1, 2.5, today), Ok(day(2026, 5, 11)));
        assert_eq!(next_review_date(2, 2.5, today), Ok(day(2026, 5, 13)));
        assert_eq!(next_review_date(3, 2.5, today), Ok(day(2026, 5, 17)));
        assert_eq!(next_review_date(4, 2.5, today), Ok(day(2026, 5, 24)));
        assert_eq!(next_review_date(5, 2.5, today), Ok(today + Duration::days(35)));
        assert_eq!(interval_days(5, 1.3), 18);
    }

    #[test]
    fn test_review_date_follows_new_level() {
        let today = day(2026, 5, 10);
        let record = record_at(1, 1);
        let result = apply_outcome(&record, Outcome::correct(3.0, 3), today).unwrap();

        assert_eq!(result.srs_level, 2);
        assert_eq!(result.next_review_date, Some(day(2026, 5, 13)));
        assert_eq!(result.last_reviewed_date, Some(today));
    }

    #[test]
    fn test_review_date_past_calendar_end_is_rejected() {
        let record = record_at(1, 1);

        assert!(matches!(
            next_review_date(2, 2.5, NaiveDate::MAX),
            Err(ReviewError::InvalidInput(_))
        ));
        assert!(matches!(
            apply_outcome(&record, Outcome::correct(3.0, 3), NaiveDate::MAX),
            Err(ReviewError::InvalidInput(_))
        ));

        // Stage 0 is due the same day, so the last calendar day still works
        let fresh = LearningRecord::new(Uuid::new_v4());
        let result = apply_outcome(&fresh, Outcome::incorrect(3.0, 3), NaiveDate::MAX).unwrap();
        assert_eq!(result.next_review_date, Some(NaiveDate::MAX));
    }

    #[test]
    fn test_mastery_is_recomputed() {
        let today = day(2026, 5, 10);
        let record = record_at(4, 2);

        let mastered = apply_outcome(&record, Outcome::correct(3.0, 3), today).unwrap();
        assert_eq!(mastered.srs_level, 5);
        assert!(mastered.is_mastered);

        let missed = apply_outcome(&mastered, Outcome::incorrect(3.0, 3), today).unwrap();
        assert_eq!(missed.srs_level, 4);
        assert!(!missed.is_mastered);
    }

    #[test]
    fn test_running_average_and_counters() {
        let today = day(2026, 5, 10);
        let mut record = LearningRecord::new(Uuid::new_v4());
        record = apply_outcome(&record, Outcome::correct(4.0, 2), today).unwrap();
        record = apply_outcome(&record, Outcome::incorrect(8.0, 5), today).unwrap();

        assert_eq!(record.total_reviews, 2);
        assert!((record.average_response_time_sec - 6.0).abs() < 1e-9);
        assert_eq!(record.confidence_level, 5);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let record = LearningRecord::new(Uuid::new_v4());
        let today = day(2026, 5, 10);

        assert!(apply_outcome(&record, Outcome::correct(1.0, 0), today).is_err());
        assert!(apply_outcome(&record, Outcome::correct(1.0, 6), today).is_err());
        assert!(apply_outcome(&record, Outcome::correct(-0.5, 3), today).is_err());
        assert!(apply_outcome(&record, Outcome::correct(f64::NAN, 3), today).is_err());

        let mut broken = record.clone();
        broken.ease_factor = 4.0;
        assert!(matches!(
            apply_outcome(&broken, Outcome::correct(1.0, 3), today),
            Err(ReviewError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_preview_intervals() {
        let record = record_at(3, 1);
        assert_eq!(preview_intervals(&record), [14, 3]);

        let fresh = LearningRecord::new(Uuid::new_v4());
        assert_eq!(preview_intervals(&fresh), [0, 0]);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(3), "3d");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(35), "1mo");
        assert_eq!(format_interval(400), "1y");
    }
}
