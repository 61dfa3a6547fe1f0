pub mod record;
pub mod values;

pub use record::{open_metadata, RecordExtractor};
pub use values::display_value;
