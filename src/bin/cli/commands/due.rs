use anyhow::{Context, Result};

use wordwise_lib::review::{due_queue, select_due, RecordStore};

use crate::app::App;
use crate::render::terminal::render_item_line;
use crate::OutputFormat;

pub fn run(
    app: &App,
    limit: Option<usize>,
    all: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let items = app.store.list_items().context("Failed to list items")?;
    let records = app.store.load_records().context("Failed to load learning records")?;
    let today = app.today();

    let queue = if all {
        due_queue(&items, &records, today)
    } else {
        let limit = limit.unwrap_or(app.config.review.daily_limit);
        select_due(&items, &records, today, limit)
    };

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = queue
                .iter()
                .map(|item| {
                    serde_json::json!({
                        "item": item,
                        "record": records.get(&item.id),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if queue.is_empty() {
                println!("Nothing due today.");
                return Ok(());
            }

            for item in &queue {
                println!("{}", render_item_line(item, records.get(&item.id), use_color));
            }

            println!("\n{} due today", queue.len());
        }
    }

    Ok(())
}
