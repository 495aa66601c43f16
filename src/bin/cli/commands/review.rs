use anyhow::{Context, Result};

use wordwise_lib::review::algorithm::interval_days;
use wordwise_lib::review::{apply_outcome, Outcome, RecordStore};

use crate::app::App;
use crate::render::terminal::render_review_result;
use crate::OutputFormat;

pub fn run(
    app: &App,
    term: &str,
    is_correct: bool,
    response_time_sec: f64,
    confidence: u8,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let mut item = app.find_item(term)?;
    let record = app.store.get_record(item.id).context("Failed to load learning record")?;

    let outcome = Outcome {
        is_correct,
        response_time_sec,
        confidence,
    };
    let updated = apply_outcome(&record, outcome, app.today())?;

    item.record_answer(is_correct);
    app.store.save_item(&item).context("Failed to save item")?;
    app.store.save_record(&updated).context("Failed to save learning record")?;

    log::info!(
        "Reviewed {}: level {} -> {}, ease {:.2}",
        item.term,
        record.srs_level,
        updated.srs_level,
        updated.ease_factor
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
        OutputFormat::Plain => {
            let days = interval_days(updated.srs_level, updated.ease_factor);
            println!("{}", render_review_result(&updated, days, use_color));
        }
    }

    Ok(())
}
