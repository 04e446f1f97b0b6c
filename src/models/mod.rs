pub mod remnant;
pub mod search_index;

pub use remnant::{COLUMNS, Inventory, RemnantRecord, SortOrder, sort_records};
pub use search_index::{ALL_MATERIALS, MaterialFilter, MaterialMatch, SearchIndex};
