use anyhow::{Context, Result};

use wordwise_lib::review::{review_stats, RecordStore};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let items = app.store.list_items().context("Failed to list items")?;
    let records = app.store.load_records().context("Failed to load learning records")?;
    let stats = review_stats(&items, &records, app.today());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("Items     {}", stats.total_items);
            println!("New       {}", stats.new_items);
            println!("Learning  {}", stats.learning_items);
            println!("Mature    {}", stats.mature_items);
            println!("Mastered  {}", stats.mastered_items);
            println!("Due today {}", stats.due_items);
        }
    }

    Ok(())
}
