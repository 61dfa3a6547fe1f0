use std::path::PathBuf;
use thiserror::Error;

/// Result type for dcmmerge operations
pub type Result<T> = std::result::Result<T, DcmMergeError>;

/// Error types for dcmmerge operations
#[derive(Error, Debug)]
pub enum DcmMergeError {
    /// Field specification document missing or unparseable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No DICOM files below the root directory
    #[error("No DICOM files found in {}", root.display())]
    NoInput { root: PathBuf },

    /// Field identifier is not of the form `(gggg,eeee)`
    #[error("Malformed field identifier '{identifier}': {reason}")]
    FieldIdentifier { identifier: String, reason: String },

    /// DICOM file could not be decoded
    #[error("Failed to read DICOM file {}: {reason}", path.display())]
    FileParse { path: PathBuf, reason: String },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DcmMergeError {
    /// Whether the error aborts the whole run
    ///
    /// Field identifier and file parse errors are recovered per field and
    /// per file respectively; everything else ends the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DcmMergeError::FieldIdentifier { .. } | DcmMergeError::FileParse { .. }
        )
    }

    pub(crate) fn malformed(identifier: &str, reason: impl Into<String>) -> Self {
        DcmMergeError::FieldIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DcmMergeError {
    fn from(e: serde_json::Error) -> Self {
        DcmMergeError::Configuration(format!("invalid field specification: {}", e))
    }
}
