use crate::error::StoreError;
use crate::models::{Inventory, RemnantRecord};

use super::inventory::InventoryStorage;

/// Owns the current remnant table snapshot
///
/// Reads are memoized until `invalidate()`. Every mutation applies the
/// change to a copy of the snapshot, writes the full table, and invalidates,
/// so the next read reflects what is on disk. A failed write leaves the
/// file untouched and the snapshot invalidated.
pub struct RemnantRepository<S: InventoryStorage> {
    storage: S,
    snapshot: Option<Inventory>,
}

impl<S: InventoryStorage> RemnantRepository<S> {
    pub fn new(storage: S) -> Self {
        RemnantRepository {
            storage,
            snapshot: None,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current table, loading it on first use
    pub fn inventory(&mut self) -> Result<&Inventory, StoreError> {
        let inventory = match self.snapshot.take() {
            Some(inventory) => inventory,
            None => self.storage.load()?,
        };
        Ok(&*self.snapshot.insert(inventory))
    }

    pub fn records(&mut self) -> Result<&[RemnantRecord], StoreError> {
        Ok(self.inventory()?.records())
    }

    /// Drop the cached snapshot
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Drop the cached snapshot and read the table again
    pub fn reload(&mut self) -> Result<&Inventory, StoreError> {
        self.invalidate();
        self.inventory()
    }

    pub fn is_cached(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Set new dimensions on every record with `id`
    /// Nothing is written when no record matches
    pub fn update_dimensions(&mut self, id: i64, dimensions: &str) -> Result<usize, StoreError> {
        let mut inventory = self.inventory()?.clone();
        let changed = inventory.update_dimensions(id, dimensions);
        if changed == 0 {
            log::debug!("Update skipped, no remnant with ID {}", id);
            return Ok(0);
        }
        self.persist(&inventory)?;
        log::info!("Updated dimensions for ID {} to {:?}", id, dimensions);
        Ok(changed)
    }

    /// Remove every record with `id`
    pub fn delete(&mut self, id: i64) -> Result<usize, StoreError> {
        let mut inventory = self.inventory()?.clone();
        let removed = inventory.remove(id);
        if removed == 0 {
            log::debug!("Delete skipped, no remnant with ID {}", id);
            return Ok(0);
        }
        self.persist(&inventory)?;
        log::info!("Deleted {} row(s) with ID {}", removed, id);
        Ok(removed)
    }

    /// Append a record; fails without writing if the id is taken
    pub fn add(&mut self, record: RemnantRecord) -> Result<(), StoreError> {
        let mut inventory = self.inventory()?.clone();
        let id = record.id;
        inventory.add(record)?;
        self.persist(&inventory)?;
        log::info!("Added remnant with ID {}", id);
        Ok(())
    }

    /// Write the full table and invalidate the snapshot, even on failure
    pub fn persist(&mut self, inventory: &Inventory) -> Result<(), StoreError> {
        let result = self.storage.save(inventory);
        self.invalidate();
        if let Err(e) = &result {
            log::error!("{}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CsvInventoryStorage;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn sample() -> Inventory {
        Inventory::new(vec![
            RemnantRecord::new(1, "Calacatta Gold", "Quartz", "46x97", "https://img/1.jpg"),
            RemnantRecord::new(2, "Absolute Black", "Granite", "30x60", "https://img/2.jpg"),
        ])
    }

    /// In-memory storage counting loads and saves
    struct MemoryStorage {
        path: PathBuf,
        table: Mutex<Inventory>,
        loads: AtomicUsize,
        saves: AtomicUsize,
        fail_saves: bool,
    }

    impl MemoryStorage {
        fn new(inventory: Inventory) -> Self {
            MemoryStorage {
                path: PathBuf::from("memory.csv"),
                table: Mutex::new(inventory),
                loads: AtomicUsize::new(0),
                saves: AtomicUsize::new(0),
                fail_saves: false,
            }
        }

        fn failing(inventory: Inventory) -> Self {
            MemoryStorage {
                fail_saves: true,
                ..Self::new(inventory)
            }
        }

        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }

        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    impl InventoryStorage for MemoryStorage {
        fn load(&self) -> Result<Inventory, StoreError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.table.lock().unwrap().clone())
        }

        fn save(&self, inventory: &Inventory) -> Result<(), StoreError> {
            if self.fail_saves {
                return Err(StoreError::persist(&self.path, "disk full"));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.table.lock().unwrap() = inventory.clone();
            Ok(())
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    #[test]
    fn test_reads_are_memoized_until_invalidated() {
        let mut repo = RemnantRepository::new(MemoryStorage::new(sample()));

        repo.records().unwrap();
        repo.records().unwrap();
        assert_eq!(repo.storage().loads(), 1);

        repo.invalidate();
        assert!(!repo.is_cached());
        repo.records().unwrap();
        assert_eq!(repo.storage().loads(), 2);

        repo.reload().unwrap();
        assert_eq!(repo.storage().loads(), 3);
    }

    #[test]
    fn test_mutation_persists_and_invalidates() {
        let mut repo = RemnantRepository::new(MemoryStorage::new(sample()));
        repo.records().unwrap();

        assert_eq!(repo.update_dimensions(1, "50x100").unwrap(), 1);
        assert_eq!(repo.storage().saves(), 1);
        assert!(!repo.is_cached());

        let inventory = repo.inventory().unwrap();
        assert_eq!(inventory.get(1).unwrap().dimensions, "50x100");
    }

    #[test]
    fn test_noop_update_and_delete_do_not_write() {
        let mut repo = RemnantRepository::new(MemoryStorage::new(sample()));

        assert_eq!(repo.update_dimensions(999, "x").unwrap(), 0);
        assert_eq!(repo.delete(999).unwrap(), 0);
        assert_eq!(repo.storage().saves(), 0);
        assert_eq!(repo.inventory().unwrap(), &sample());
    }

    #[test]
    fn test_duplicate_add_fails_without_writing() {
        let mut repo = RemnantRepository::new(MemoryStorage::new(sample()));

        let err = repo
            .add(RemnantRecord::new(1, "Again", "Quartz", "1x1", ""))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(1)));
        assert_eq!(repo.storage().saves(), 0);
        assert_eq!(repo.inventory().unwrap(), &sample());
    }

    #[test]
    fn test_add_then_delete_restores_table() {
        let mut repo = RemnantRepository::new(MemoryStorage::new(sample()));

        let next = repo.inventory().unwrap().next_id();
        repo.add(RemnantRecord::new(next, "Carrara", "Marble", "20x40", ""))
            .unwrap();
        assert_eq!(repo.records().unwrap().len(), 3);

        assert_eq!(repo.delete(next).unwrap(), 1);
        assert_eq!(repo.inventory().unwrap(), &sample());
    }

    #[test]
    fn test_failed_persist_surfaces_error_and_invalidates() {
        let mut repo = RemnantRepository::new(MemoryStorage::failing(sample()));
        repo.records().unwrap();

        let err = repo.delete(1).unwrap_err();
        assert!(matches!(err, StoreError::Persist { .. }));
        assert!(!repo.is_cached());

        // Storage still holds the untouched table
        assert_eq!(repo.inventory().unwrap(), &sample());
    }

    #[test]
    fn test_csv_backed_mutations_reach_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stock.csv");
        CsvInventoryStorage::new(path.clone()).save(&sample()).unwrap();

        let mut repo = RemnantRepository::new(CsvInventoryStorage::new(path.clone()));
        repo.delete(2).unwrap();
        repo.add(RemnantRecord::new(3, "Carrara", "Marble", "20x40", "u"))
            .unwrap();

        let on_disk = CsvInventoryStorage::new(path).load().unwrap();
        let ids: Vec<i64> = on_disk.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
