//! Storage for vocabulary items and their learning records
//!
//! The scheduler itself never persists anything; callers load records
//! through a [`RecordStore`], run them through the scheduler, and save the
//! result. [`FileRecordStore`] is the JSON-on-disk implementation:
//! ```text
//! {data-dir}/
//! ├── items.json           # Array of all vocabulary items
//! └── records/
//!     └── {item-id}.json   # Learning record per item
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use super::models::{LearningRecord, VocabularyItem};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Supplies and accepts learning records for the scheduler
pub trait RecordStore {
    fn list_items(&self) -> Result<Vec<VocabularyItem>>;

    fn save_item(&self, item: &VocabularyItem) -> Result<()>;

    /// Removes the item and its learning record
    fn delete_item(&self, item_id: Uuid) -> Result<()>;

    /// Stored record, or a fresh default record if the item has none yet
    fn get_record(&self, item_id: Uuid) -> Result<LearningRecord>;

    fn save_record(&self, record: &LearningRecord) -> Result<()>;

    /// All stored records keyed by item id
    fn load_records(&self) -> Result<HashMap<Uuid, LearningRecord>>;
}

/// JSON file store rooted at one data directory
pub struct FileRecordStore {
    base_path: PathBuf,
}

impl FileRecordStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn items_path(&self) -> PathBuf {
        self.base_path.join("items.json")
    }

    fn records_dir(&self) -> PathBuf {
        self.base_path.join("records")
    }

    fn record_path(&self, item_id: Uuid) -> PathBuf {
        self.records_dir().join(format!("{}.json", item_id))
    }

    /// Create the directory layout and an empty item list
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.records_dir())?;

        let items_path = self.items_path();
        if !items_path.exists() {
            let empty: Vec<VocabularyItem> = Vec::new();
            fs::write(&items_path, serde_json::to_string_pretty(&empty)?)?;
        }

        Ok(())
    }

    fn write_items(&self, items: &[VocabularyItem]) -> Result<()> {
        self.init()?;
        fs::write(self.items_path(), serde_json::to_string_pretty(items)?)?;
        Ok(())
    }

    /// Find an item by id
    pub fn get_item(&self, item_id: Uuid) -> Result<VocabularyItem> {
        self.list_items()?
            .into_iter()
            .find(|item| item.id == item_id)
            .ok_or(StorageError::ItemNotFound(item_id))
    }

    /// Find an item by exact term, case-insensitive
    pub fn find_by_term(&self, term: &str) -> Result<Option<VocabularyItem>> {
        let needle = term.to_lowercase();
        Ok(self
            .list_items()?
            .into_iter()
            .find(|item| item.term.to_lowercase() == needle))
    }
}

impl RecordStore for FileRecordStore {
    fn list_items(&self) -> Result<Vec<VocabularyItem>> {
        let items_path = self.items_path();
        if !items_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&items_path)?;
        let items: Vec<VocabularyItem> = serde_json::from_str(&content)?;
        Ok(items)
    }

    fn save_item(&self, item: &VocabularyItem) -> Result<()> {
        let mut items = self.list_items()?;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        self.write_items(&items)
    }

    fn delete_item(&self, item_id: Uuid) -> Result<()> {
        let mut items = self.list_items()?;
        let before = items.len();
        items.retain(|item| item.id != item_id);
        if items.len() == before {
            return Err(StorageError::ItemNotFound(item_id));
        }
        self.write_items(&items)?;

        let record_path = self.record_path(item_id);
        if record_path.exists() {
            fs::remove_file(&record_path)?;
        }

        Ok(())
    }

    fn get_record(&self, item_id: Uuid) -> Result<LearningRecord> {
        let record_path = self.record_path(item_id);
        if !record_path.exists() {
            return Ok(LearningRecord::new(item_id));
        }

        let content = fs::read_to_string(&record_path)?;
        let record: LearningRecord = serde_json::from_str(&content)?;
        Ok(record)
    }

    fn save_record(&self, record: &LearningRecord) -> Result<()> {
        self.init()?;
        fs::write(
            self.record_path(record.item_id),
            serde_json::to_string_pretty(record)?,
        )?;
        Ok(())
    }

    fn load_records(&self) -> Result<HashMap<Uuid, LearningRecord>> {
        let mut records = HashMap::new();
        let records_dir = self.records_dir();
        if !records_dir.exists() {
            return Ok(records);
        }

        for entry in fs::read_dir(&records_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                match serde_json::from_str::<LearningRecord>(&content) {
                    Ok(record) => {
                        records.insert(record.item_id, record);
                    }
                    Err(e) => {
                        log::warn!("Skipping unreadable record {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileRecordStore) {
        let dir = TempDir::new().unwrap();
        let store = FileRecordStore::new(dir.path().to_path_buf());
        store.init().unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_record_is_default() {
        let (_dir, store) = store();
        let id = Uuid::new_v4();

        assert_eq!(store.get_record(id).unwrap(), LearningRecord::new(id));
    }

    #[test]
    fn test_item_and_record_round_trip() {
        let (_dir, store) = store();
        let item = VocabularyItem::new("sonder".into(), "awareness of others' lives".into());
        store.save_item(&item).unwrap();

        let mut record = LearningRecord::new(item.id);
        record.srs_level = 3;
        store.save_record(&record).unwrap();

        assert_eq!(store.list_items().unwrap().len(), 1);
        assert_eq!(store.get_record(item.id).unwrap().srs_level, 3);
        assert_eq!(store.load_records().unwrap().len(), 1);
        assert!(store.find_by_term("SONDER").unwrap().is_some());
    }

    #[test]
    fn test_get_item_by_id() {
        let (_dir, store) = store();
        let item = VocabularyItem::new("hiraeth".into(), "longing for home".into());
        store.save_item(&item).unwrap();

        assert_eq!(store.get_item(item.id).unwrap().term, "hiraeth");

        let missing = Uuid::new_v4();
        assert!(matches!(
            store.get_item(missing),
            Err(StorageError::ItemNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_save_item_replaces_existing() {
        let (_dir, store) = store();
        let mut item = VocabularyItem::new("petrichor".into(), "smell of rain".into());
        store.save_item(&item).unwrap();
        item.incorrect_count = 2;
        store.save_item(&item).unwrap();

        let items = store.list_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].incorrect_count, 2);
    }

    #[test]
    fn test_delete_item_removes_record() {
        let (_dir, store) = store();
        let item = VocabularyItem::new("apricity".into(), "warmth of winter sun".into());
        store.save_item(&item).unwrap();
        store.save_record(&LearningRecord::new(item.id)).unwrap();

        store.delete_item(item.id).unwrap();

        assert!(store.list_items().unwrap().is_empty());
        assert!(store.load_records().unwrap().is_empty());
        assert!(matches!(
            store.delete_item(item.id),
            Err(StorageError::ItemNotFound(_))
        ));
    }
}
