use anyhow::{Context, Result};

use wordwise_lib::review::{format_interval, preview_intervals, RecordStore};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, term: &str, format: &OutputFormat) -> Result<()> {
    let item = app.find_item(term)?;
    let record = app.store.get_record(item.id).context("Failed to load learning record")?;
    let [correct, incorrect] = preview_intervals(&record);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "term": item.term,
                "srsLevel": record.srs_level,
                "easeFactor": record.ease_factor,
                "correctIntervalDays": correct,
                "incorrectIntervalDays": incorrect,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} (level {}, ease {:.2})", item.term, record.srs_level, record.ease_factor);
            println!("  correct:   {}", format_interval(correct));
            println!("  incorrect: {}", format_interval(incorrect));
        }
    }

    Ok(())
}
