use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::models::{COLUMNS, Inventory, RemnantRecord};

/// Trait for remnant table persistence
pub trait InventoryStorage: Send + Sync {
    /// Read the whole table
    fn load(&self) -> Result<Inventory, StoreError>;

    /// Replace the whole table
    fn save(&self, inventory: &Inventory) -> Result<(), StoreError>;

    /// Get the storage file path
    fn path(&self) -> &Path;
}

/// CSV-backed implementation of InventoryStorage
/// Header row `id,name,material,dimensions,image_url`, one record per row
/// Saves rewrite the full file through a .tmp sibling and a rename
pub struct CsvInventoryStorage {
    path: PathBuf,
}

impl CsvInventoryStorage {
    pub fn new(path: PathBuf) -> Self {
        CsvInventoryStorage { path }
    }

    /// Write a header-only table if no file exists yet
    /// Returns false when a table was already present
    pub fn create_empty(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Inventory::default())?;
        log::info!("Created empty remnant table at {:?}", self.path);
        Ok(true)
    }

    fn encode(&self, inventory: &Inventory) -> Result<Vec<u8>, StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        // Written by hand so an empty table still gets its header
        writer
            .write_record(COLUMNS)
            .map_err(|e| StoreError::persist(&self.path, e))?;
        for record in inventory.records() {
            writer
                .serialize(record)
                .map_err(|e| StoreError::persist(&self.path, e))?;
        }

        writer
            .into_inner()
            .map_err(|e| StoreError::persist(&self.path, e.error()))
    }
}

impl InventoryStorage for CsvInventoryStorage {
    fn load(&self) -> Result<Inventory, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::load(&self.path, "file not found"));
        }

        let bytes = fs::read(&self.path).map_err(|e| StoreError::load(&self.path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes.as_slice());

        let headers = reader
            .headers()
            .map_err(|e| StoreError::load(&self.path, e))?
            .clone();
        for column in COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(StoreError::load(
                    &self.path,
                    format!("missing required column '{}'", column),
                ));
            }
        }

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<RemnantRecord>().enumerate() {
            // +2: header line plus 1-based numbering
            let record = result
                .map_err(|e| StoreError::load(&self.path, format!("row {}: {}", row + 2, e)))?;
            records.push(record);
        }

        let inventory = Inventory::new(records);
        let duplicates = inventory.duplicate_ids();
        if !duplicates.is_empty() {
            log::warn!(
                "Remnant table {:?} contains duplicate IDs {:?}",
                self.path,
                duplicates
            );
        }

        log::info!("Loaded {} remnants from {:?}", inventory.len(), self.path);
        Ok(inventory)
    }

    fn save(&self, inventory: &Inventory) -> Result<(), StoreError> {
        let bytes = self.encode(inventory)?;

        let tmp_path = self.path.with_extension("csv.tmp");

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::persist(&self.path, e))?;
            }
        }

        if let Err(e) = fs::write(&tmp_path, &bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::persist(&tmp_path, e));
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::persist(&self.path, e));
        }

        log::debug!("Saved {} remnants to {:?}", inventory.len(), self.path);

        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
