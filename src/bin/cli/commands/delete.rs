use anyhow::{Context, Result};

use wordwise_lib::review::RecordStore;

use crate::app::App;

pub fn run(app: &App, term: &str) -> Result<()> {
    let item = app.find_item(term)?;
    app.store
        .delete_item(item.id)
        .with_context(|| format!("Failed to delete '{}'", item.term))?;

    println!("Deleted '{}'", item.term);
    Ok(())
}
