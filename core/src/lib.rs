pub mod api;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod extraction;
pub mod observer;
pub mod table;
pub mod types;

pub use api::{resolve_destination, DicomMerger, RunReport, RunStatus};
pub use cli::report::TextReport;
pub use discovery::discover_dicom_files;
pub use error::{DcmMergeError, Result};
pub use extraction::RecordExtractor;
pub use observer::{LogObserver, NullObserver, RunEvent, RunObserver};
pub use table::TableWriter;
pub use types::*;
