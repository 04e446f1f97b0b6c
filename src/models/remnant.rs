use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::StoreError;

/// Column order of the backing table
pub const COLUMNS: [&str; 5] = ["id", "name", "material", "dimensions", "image_url"];

/// One row of remnant inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemnantRecord {
    /// Externally visible identifier, never reassigned by the store
    pub id: i64,
    /// Color or style name
    pub name: String,
    /// Category used for filtering (Quartz, Granite, ...)
    pub material: String,
    /// Free-form size descriptor, e.g. "46x97"
    pub dimensions: String,
    /// Externally hosted image
    pub image_url: String,
}

impl RemnantRecord {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        material: impl Into<String>,
        dimensions: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        RemnantRecord {
            id,
            name: name.into(),
            material: material.into(),
            dimensions: dimensions.into(),
            image_url: image_url.into(),
        }
    }

    /// One-line summary used as the catalog heading
    pub fn heading(&self) -> String {
        format!("{} ({}) - {}", self.name, self.material, self.dimensions)
    }
}

/// Presentation ordering applied after filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Keep file order
    #[default]
    AsStored,
    /// Name ascending, ties keep file order
    Name,
    /// Id ascending
    Id,
}

impl SortOrder {
    pub fn compare(&self, a: &RemnantRecord, b: &RemnantRecord) -> Ordering {
        match self {
            SortOrder::AsStored => Ordering::Equal,
            SortOrder::Name => a.name.cmp(&b.name),
            SortOrder::Id => a.id.cmp(&b.id),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "as-stored" | "none" => Ok(SortOrder::AsStored),
            "name" => Ok(SortOrder::Name),
            "id" => Ok(SortOrder::Id),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// The full remnant table, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<RemnantRecord>,
}

impl Inventory {
    pub fn new(records: Vec<RemnantRecord>) -> Self {
        Inventory { records }
    }

    pub fn records(&self) -> &[RemnantRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<RemnantRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: i64) -> Option<&RemnantRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Conventional id for a new record: one past the current maximum
    pub fn next_id(&self) -> i64 {
        self.records.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
    }

    /// Distinct materials in first-seen order
    pub fn materials(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for record in &self.records {
            if !seen.iter().any(|m| m == &record.material) {
                seen.push(record.material.clone());
            }
        }
        seen
    }

    /// Ids that appear on more than one row
    pub fn duplicate_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        let mut dups: Vec<i64> = ids
            .windows(2)
            .filter(|w| w[0] == w[1])
            .map(|w| w[0])
            .collect();
        dups.dedup();
        dups
    }

    /// Replace `dimensions` on every row with `id`
    /// Returns the number of rows changed
    pub fn update_dimensions(&mut self, id: i64, dimensions: &str) -> usize {
        let mut changed = 0;
        for record in self.records.iter_mut().filter(|r| r.id == id) {
            record.dimensions = dimensions.to_string();
            changed += 1;
        }
        changed
    }

    /// Remove every row with `id`
    /// Returns the number of rows removed
    pub fn remove(&mut self, id: i64) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        before - self.records.len()
    }

    /// Append a record, rejecting ids already present
    pub fn add(&mut self, record: RemnantRecord) -> Result<(), StoreError> {
        if self.contains_id(record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.records.push(record);
        Ok(())
    }
}

/// Stable sort of a filtered view
pub fn sort_records(records: &mut [RemnantRecord], order: SortOrder) {
    if order != SortOrder::AsStored {
        records.sort_by(|a, b| order.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Inventory {
        Inventory::new(vec![
            RemnantRecord::new(1, "Calacatta Gold", "Quartz", "46x97", "https://img/1.jpg"),
            RemnantRecord::new(2, "Absolute Black", "Granite", "30x60", "https://img/2.jpg"),
            RemnantRecord::new(3, "Alaska White", "Granite", "55x110", "https://img/3.jpg"),
        ])
    }

    #[test]
    fn test_update_dimensions_touches_only_dimensions() {
        let mut inventory = sample();
        let before = inventory.get(1).unwrap().clone();

        assert_eq!(inventory.update_dimensions(1, "50x100"), 1);

        let after = inventory.get(1).unwrap();
        assert_eq!(after.dimensions, "50x100");
        assert_eq!(after.name, before.name);
        assert_eq!(after.material, before.material);
        assert_eq!(after.image_url, before.image_url);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut inventory = sample();
        let before = inventory.clone();
        assert_eq!(inventory.update_dimensions(999, "x"), 0);
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_add_then_remove_round_trips() {
        let mut inventory = sample();
        let original = inventory.clone();

        let record = RemnantRecord::new(4, "Carrara", "Marble", "20x40", "https://img/4.jpg");
        inventory.add(record).unwrap();
        assert_eq!(inventory.len(), 4);

        assert_eq!(inventory.remove(4), 1);
        assert_eq!(inventory, original);
    }

    #[test]
    fn test_add_duplicate_leaves_table_unchanged() {
        let mut inventory = sample();
        let before = inventory.clone();

        let dup = RemnantRecord::new(2, "Other", "Quartz", "1x1", "");
        let err = inventory.add(dup).unwrap_err();

        assert!(matches!(err, StoreError::DuplicateId(2)));
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_remove_takes_every_matching_row() {
        let mut inventory = sample();
        inventory.records.push(RemnantRecord::new(2, "Dup", "Granite", "1x1", ""));
        assert_eq!(inventory.duplicate_ids(), vec![2]);

        assert_eq!(inventory.remove(2), 2);
        assert!(!inventory.contains_id(2));
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_next_id_and_materials() {
        let inventory = sample();
        assert_eq!(inventory.next_id(), 4);
        assert_eq!(inventory.materials(), vec!["Quartz", "Granite"]);
        assert_eq!(Inventory::default().next_id(), 1);
    }

    #[test]
    fn test_sort_by_name_is_explicit() {
        let mut records = sample().into_records();
        sort_records(&mut records, SortOrder::AsStored);
        assert_eq!(records[0].id, 1);

        sort_records(&mut records, SortOrder::Name);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Absolute Black", "Alaska White", "Calacatta Gold"]);

        sort_records(&mut records, SortOrder::Id);
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("Name".parse::<SortOrder>(), Ok(SortOrder::Name));
        assert_eq!("none".parse::<SortOrder>(), Ok(SortOrder::AsStored));
        assert!("size".parse::<SortOrder>().is_err());
    }
}
