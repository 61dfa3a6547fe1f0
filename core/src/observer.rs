//! Observability port for a merge run
//!
//! Pipeline components report what happens through a [`RunObserver`] passed
//! in by the caller instead of writing to a process-wide logger. The
//! [`LogObserver`] adapter forwards events to the `log` facade.

use crate::error::DcmMergeError;
use log::{debug, error, info, warn};
use std::path::Path;
use std::time::Duration;

/// Something observable that happened during a run
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// Run started with resolved root and destination
    Started { root: &'a Path, destination: &'a Path },

    /// Root directory does not exist
    RootMissing { root: &'a Path },

    /// A directory entry could not be read during discovery
    WalkError { message: String },

    /// Discovery finished
    Discovered { count: usize },

    /// A configured field has an identifier that will never resolve
    InvalidField { field: &'a str, error: &'a DcmMergeError },

    /// Header row written to the destination
    HeaderWritten { columns: usize },

    /// A field had no value in a file
    FieldUnresolved { path: &'a Path, field: &'a str, reason: &'a str },

    /// A row was written for a file
    RecordWritten { path: &'a Path },

    /// A file was skipped and contributes no row
    FileSkipped { path: &'a Path, error: &'a DcmMergeError },

    /// Run finished, successfully or not
    Finished { written: usize, skipped: usize, elapsed: Duration },
}

/// Receives events from a merge run
pub trait RunObserver {
    fn on_event(&mut self, event: RunEvent<'_>);
}

/// Observer that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn on_event(&mut self, _event: RunEvent<'_>) {}
}

/// Observer forwarding events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn on_event(&mut self, event: RunEvent<'_>) {
        match event {
            RunEvent::Started { root, destination } => {
                info!("Root directory: {}", root.display());
                info!("Output file: {}", destination.display());
            }
            RunEvent::RootMissing { root } => {
                warn!("Root directory {} does not exist", root.display());
            }
            RunEvent::WalkError { message } => warn!("{}", message),
            RunEvent::Discovered { count } => info!("Found {} DICOM files", count),
            RunEvent::InvalidField { field, error } => {
                warn!("Field '{}' will be empty: {}", field, error);
            }
            RunEvent::HeaderWritten { columns } => {
                info!("Header written ({} columns)", columns);
            }
            RunEvent::FieldUnresolved {
                path,
                field,
                reason,
            } => debug!("{}: field '{}' empty ({})", path.display(), field, reason),
            RunEvent::RecordWritten { path } => debug!("Processed: {}", path.display()),
            RunEvent::FileSkipped { path, error } => {
                error!("Skipping {}: {}", path.display(), error);
            }
            RunEvent::Finished {
                written,
                skipped,
                elapsed,
            } => info!(
                "Wrote {} rows, skipped {} files in {:.2?}",
                written, skipped, elapsed
            ),
        }
    }
}

impl<T: RunObserver + ?Sized> RunObserver for &mut T {
    fn on_event(&mut self, event: RunEvent<'_>) {
        (**self).on_event(event)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Observer keeping a one-line summary of each event, for assertions
    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        pub events: Vec<String>,
    }

    impl RecordingObserver {
        pub fn count(&self, prefix: &str) -> usize {
            self.events.iter().filter(|e| e.starts_with(prefix)).count()
        }
    }

    impl RunObserver for RecordingObserver {
        fn on_event(&mut self, event: RunEvent<'_>) {
            let line = match event {
                RunEvent::Started { .. } => "started".to_string(),
                RunEvent::RootMissing { .. } => "root-missing".to_string(),
                RunEvent::WalkError { message } => format!("walk-error {}", message),
                RunEvent::Discovered { count } => format!("discovered {}", count),
                RunEvent::InvalidField { field, .. } => format!("invalid-field {}", field),
                RunEvent::HeaderWritten { columns } => format!("header {}", columns),
                RunEvent::FieldUnresolved { path, field, .. } => {
                    format!("unresolved {} {}", path.display(), field)
                }
                RunEvent::RecordWritten { path } => format!("written {}", path.display()),
                RunEvent::FileSkipped { path, .. } => format!("skipped {}", path.display()),
                RunEvent::Finished {
                    written, skipped, ..
                } => format!("finished {} {}", written, skipped),
            };
            self.events.push(line);
        }
    }
}
