use std::path::PathBuf;

/// Outcome of looking up one field in one file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum FieldValue {
    /// Value found, already rendered and sanitized for the table
    Present(String),

    /// Tag not present in the file, or its value has no text form
    Missing,

    /// Identifier could not be parsed; holds the reason
    InvalidIdentifier(String),
}

impl FieldValue {
    /// Text written to the table cell; empty unless the value is present
    pub fn as_cell(&self) -> &str {
        match self {
            FieldValue::Present(value) => value,
            FieldValue::Missing | FieldValue::InvalidIdentifier(_) => "",
        }
    }
}

/// One file's extracted row
///
/// Values follow the order of the field specification. Records are written
/// as soon as they are produced and never retained across files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Path of the source file, as produced by discovery
    pub file_path: PathBuf,

    /// One value per configured field
    pub values: Vec<FieldValue>,
}

impl Record {
    pub fn new(file_path: PathBuf, values: Vec<FieldValue>) -> Self {
        Self { file_path, values }
    }

    /// Number of table columns this record produces
    pub fn column_count(&self) -> usize {
        self.values.len() + 1
    }
}
