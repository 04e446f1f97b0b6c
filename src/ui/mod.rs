pub mod catalog;
pub mod status;
pub mod table;

pub use catalog::render_catalog;
pub use status::{describe_image_error, describe_outcome, describe_store_error};
pub use table::render_table;
