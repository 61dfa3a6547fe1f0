//! Core type definitions for DICOM table merging
//!
//! This module provides the data model shared across the pipeline:
//! - [`FieldSpec`]: Ordered mapping of output column names to tag identifiers
//! - [`parse_tag_identifier`]: Conversion of `(gggg,eeee)` strings to DICOM tags
//! - [`Record`]: One file's extracted row, with per-field [`FieldValue`] outcomes

mod field_spec;
mod record;
mod tag_identifier;

pub use field_spec::{FieldEntry, FieldSpec, DEFAULT_FIELD_SPEC_PATH, FILE_PATH_COLUMN};
pub use record::{FieldValue, Record};
pub use tag_identifier::parse_tag_identifier;
