use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};

use wordwise_lib::config::AppConfig;
use wordwise_lib::review::{FileRecordStore, RecordStore, VocabularyItem};

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub store: FileRecordStore,
}

impl App {
    /// Load config and open the record store
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_path().context("Failed to locate config directory")?,
        };
        let config = AppConfig::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let data_dir = config.data_dir().context("Failed to get data directory")?;
        let store = FileRecordStore::new(data_dir);
        store.init().context("Failed to initialize storage")?;

        Ok(Self { config, store })
    }

    /// Calendar date reviews are recorded against
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Find an item by term (case-insensitive, exact match first, then prefix)
    pub fn find_item(&self, term: &str) -> Result<VocabularyItem> {
        let items = self.store.list_items().context("Failed to list items")?;
        let needle = term.to_lowercase();

        if let Some(item) = items.iter().find(|i| i.term.to_lowercase() == needle) {
            return Ok(item.clone());
        }

        let matches: Vec<&VocabularyItem> = items
            .iter()
            .filter(|i| i.term.to_lowercase().starts_with(&needle))
            .collect();

        match matches.len() {
            0 => bail!("No item matching '{}'", term),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous term '{}'. Matches:\n{}",
                term,
                matches
                    .iter()
                    .map(|i| format!("  - {}", i.term))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }
}
