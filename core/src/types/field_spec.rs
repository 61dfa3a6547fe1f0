use crate::error::{DcmMergeError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Name of the trailing column holding the source file path
pub const FILE_PATH_COLUMN: &str = "FilePath";

/// Conventional location of the field specification document
pub const DEFAULT_FIELD_SPEC_PATH: &str = "selected_tags.json";

/// One output column: a field name and the identifier it is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Column name in the output table
    pub name: String,

    /// Identifier string, expected as `(gggg,eeee)`
    pub identifier: String,
}

/// Ordered mapping from field name to field identifier
///
/// Loaded once per run and immutable afterwards. Field order defines the
/// column order of the output table.
///
/// # Example
///
/// ```
/// use dcmmerge_core::FieldSpec;
///
/// let spec = FieldSpec::from_json_str(
///     r#"{"Modality": "(0008,0060)", "SeriesDescription": "(0008,103E)"}"#,
/// )
/// .unwrap();
///
/// assert_eq!(spec.len(), 2);
/// assert_eq!(spec.header(), vec!["Modality", "SeriesDescription", "FilePath"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    fields: Vec<FieldEntry>,
}

impl FieldSpec {
    /// Builds a field specification from ordered `(name, identifier)` pairs
    ///
    /// # Errors
    ///
    /// Returns [`DcmMergeError::Configuration`] for empty or duplicate names,
    /// or a name that collides with the `FilePath` column.
    pub fn new<I, N, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut fields = Vec::new();

        for (name, identifier) in pairs {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(DcmMergeError::Configuration(
                    "field names must not be empty".to_string(),
                ));
            }
            if name == FILE_PATH_COLUMN {
                return Err(DcmMergeError::Configuration(format!(
                    "field name '{}' is reserved for the file path column",
                    FILE_PATH_COLUMN
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(DcmMergeError::Configuration(format!(
                    "duplicate field name '{}'",
                    name
                )));
            }
            fields.push(FieldEntry {
                name,
                identifier: identifier.into(),
            });
        }

        Ok(Self { fields })
    }

    /// Parses a JSON object of `"name": "(gggg,eeee)"` pairs, keeping key order
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or_else(|| {
            DcmMergeError::Configuration("field specification must be a JSON object".to_string())
        })?;

        let mut pairs = Vec::with_capacity(object.len());
        for (name, identifier) in object {
            let identifier = identifier.as_str().ok_or_else(|| {
                DcmMergeError::Configuration(format!(
                    "identifier for field '{}' must be a string, got {}",
                    name, identifier
                ))
            })?;
            pairs.push((name.clone(), identifier.to_string()));
        }

        Self::new(pairs)
    }

    /// Loads the field specification document from disk
    ///
    /// # Errors
    ///
    /// A missing or unreadable file is a [`DcmMergeError::Configuration`]
    /// error, as is any content error reported by [`FieldSpec::from_json_str`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DcmMergeError::Configuration(format!(
                "cannot read field specification {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of columns of every table row (fields plus `FilePath`)
    pub fn column_count(&self) -> usize {
        self.fields.len() + 1
    }

    /// Header row: field names in order, then `FilePath`
    pub fn header(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .chain(std::iter::once(FILE_PATH_COLUMN))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_json_preserves_order() {
        let spec = FieldSpec::from_json_str(
            r#"{"Zeta": "(0010,0020)", "Alpha": "(0008,0060)", "Mid": "(0018,5101)"}"#,
        )
        .unwrap();

        let names: Vec<_> = spec.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(spec.column_count(), 4);
        assert_eq!(spec.header().last(), Some(&FILE_PATH_COLUMN));
    }

    #[test]
    fn test_malformed_identifier_is_kept() {
        // Identifiers are validated per field during extraction, not at load time
        let spec = FieldSpec::from_json_str(r#"{"Broken": "not a tag"}"#).unwrap();
        assert_eq!(spec.fields()[0].identifier, "not a tag");
    }

    #[test]
    fn test_invalid_json() {
        let err = FieldSpec::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DcmMergeError::Configuration(_)));
    }

    #[test]
    fn test_non_object_root() {
        let err = FieldSpec::from_json_str(r#"["(0010,0020)"]"#).unwrap_err();
        assert!(matches!(err, DcmMergeError::Configuration(_)));
    }

    #[test]
    fn test_non_string_identifier() {
        let err = FieldSpec::from_json_str(r#"{"Rows": 40}"#).unwrap_err();
        assert!(matches!(err, DcmMergeError::Configuration(_)));
    }

    #[test]
    fn test_reserved_and_duplicate_names() {
        assert!(FieldSpec::new([("FilePath", "(0010,0020)")]).is_err());
        assert!(FieldSpec::new([("A", "(0010,0020)"), ("A", "(0010,0030)")]).is_err());
        assert!(FieldSpec::new([(" ", "(0010,0020)")]).is_err());
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"PatientID": "(0010,0020)"}}"#).unwrap();

        let spec = FieldSpec::from_path(file.path()).unwrap();
        assert_eq!(
            spec.fields(),
            &[FieldEntry {
                name: "PatientID".to_string(),
                identifier: "(0010,0020)".to_string(),
            }]
        );
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = FieldSpec::from_path(dir.path().join("selected_tags.json")).unwrap_err();
        assert!(matches!(err, DcmMergeError::Configuration(_)));
        assert!(err.is_fatal());
    }
}
