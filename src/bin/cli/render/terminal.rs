use wordwise_lib::review::{format_interval, LearningRecord, VocabularyItem};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Stage shown as filled and empty pips, e.g. "●●○○○"
pub fn render_level(level: u8) -> String {
    let filled = usize::from(level.min(5));
    format!("{}{}", "\u{25cf}".repeat(filled), "\u{25cb}".repeat(5 - filled))
}

/// One line per item: term, meaning, stage, and miss count
pub fn render_item_line(item: &VocabularyItem, record: Option<&LearningRecord>, use_color: bool) -> String {
    let level = record.map_or(0, |r| r.srs_level);
    let mut line = format!(
        "{} {} {}",
        render_level(level),
        paint(&item.term, Color::BOLD, use_color),
        paint(&format!("- {}", item.meaning), Color::DIM, use_color),
    );
    if item.incorrect_count > 0 {
        line.push_str(&paint(&format!("  ({} missed)", item.incorrect_count), Color::RED, use_color));
    }
    if record.is_some_and(|r| r.is_mastered) {
        line.push_str(&paint("  mastered", Color::GREEN, use_color));
    }
    line
}

/// Summary after an answer: new stage, next date, interval
pub fn render_review_result(record: &LearningRecord, interval_days: i64, use_color: bool) -> String {
    let next = record
        .next_review_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "now".to_string());
    format!(
        "Level {} {}  next review {} ({})",
        record.srs_level,
        render_level(record.srs_level),
        paint(&next, Color::YELLOW, use_color),
        format_interval(interval_days),
    )
}
