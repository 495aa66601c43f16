use anyhow::{bail, Context, Result};

use wordwise_lib::review::{RecordStore, VocabularyItem};

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    term: String,
    meaning: String,
    example: Option<String>,
    catalog: bool,
    format: &OutputFormat,
) -> Result<()> {
    let term = term.trim().to_string();
    if term.is_empty() {
        bail!("Term cannot be empty");
    }
    if app.store.find_by_term(&term)?.is_some() {
        bail!("'{}' is already in your word list", term);
    }

    let mut item = if catalog {
        VocabularyItem::from_catalog(term, meaning)
    } else {
        VocabularyItem::new(term, meaning)
    };
    item.example = example;

    app.store.save_item(&item).context("Failed to save item")?;
    log::info!("Added item {} ({})", item.term, item.id);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&item)?),
        OutputFormat::Plain => println!("Added '{}'", item.term),
    }

    Ok(())
}
