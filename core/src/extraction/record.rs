use crate::error::{DcmMergeError, Result};
use crate::table::sanitize_cell;
use crate::types::{parse_tag_identifier, FieldEntry, FieldSpec, FieldValue, Record};
use dicom_dictionary_std::tags::PIXEL_DATA;
use dicom_object::{DefaultDicomObject, InMemDicomObject, OpenFileOptions};
use std::path::{Path, PathBuf};

use super::values::display_value;

/// Opens a DICOM file, reading the data set only up to the pixel data
///
/// The bulk payload is never loaded or decoded.
pub fn open_metadata(path: &Path) -> Result<DefaultDicomObject> {
    OpenFileOptions::new()
        .read_until(PIXEL_DATA)
        .open_file(path)
        .map_err(|e| DcmMergeError::FileParse {
            path: path.to_path_buf(),
            reason: format!("{}", e),
        })
}

/// Extracts one [`Record`] per file for a fixed field specification
///
/// # Example
///
/// ```
/// use dcmmerge_core::{FieldSpec, FieldValue, RecordExtractor};
/// use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
/// use dicom_object::InMemDicomObject;
///
/// let spec = FieldSpec::new([
///     ("Modality", "(0008,0060)"),
///     ("PatientID", "(0010,0020)"),
/// ])
/// .unwrap();
///
/// let dcm = InMemDicomObject::from_element_iter([DataElement::new(
///     Tag(0x0008, 0x0060),
///     VR::CS,
///     PrimitiveValue::from("MR"),
/// )]);
///
/// let record = RecordExtractor::new(&spec).extract_dicom("scan.dcm".into(), &dcm);
///
/// assert_eq!(record.values[0], FieldValue::Present("MR".to_string()));
/// assert_eq!(record.values[1], FieldValue::Missing);
/// ```
pub struct RecordExtractor<'a> {
    spec: &'a FieldSpec,
}

impl<'a> RecordExtractor<'a> {
    pub fn new(spec: &'a FieldSpec) -> Self {
        Self { spec }
    }

    /// Reads the metadata of `path` and extracts its record
    ///
    /// # Errors
    ///
    /// Returns [`DcmMergeError::FileParse`] if the file cannot be decoded;
    /// the caller skips the file. Field-level problems never fail the file.
    pub fn extract_file(&self, path: &Path) -> Result<Record> {
        let dcm = open_metadata(path)?;
        Ok(self.extract_dicom(path.to_path_buf(), &dcm))
    }

    /// Extracts a record from an already-opened DICOM object
    pub fn extract_dicom(&self, path: PathBuf, dcm: &InMemDicomObject) -> Record {
        let values = self
            .spec
            .fields()
            .iter()
            .map(|field| Self::field_value(dcm, field))
            .collect();

        Record::new(path, values)
    }

    /// Looks up a single field
    fn field_value(dcm: &InMemDicomObject, field: &FieldEntry) -> FieldValue {
        match parse_tag_identifier(&field.identifier) {
            Ok(tag) => match display_value(dcm, tag) {
                Some(value) => FieldValue::Present(sanitize_cell(&value).into_owned()),
                None => FieldValue::Missing,
            },
            Err(e) => FieldValue::InvalidIdentifier(e.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use dicom_object::mem::InMemElement;
    use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
    use std::path::Path;

    /// Writes a minimal explicit VR little endian DICOM file
    pub fn write_dicom(path: &Path, elements: impl IntoIterator<Item = InMemElement>) {
        let obj = InMemDicomObject::from_element_iter(elements);
        let file_obj = obj
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax("1.2.840.10008.1.2.1")
                    .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.4")
                    .media_storage_sop_instance_uid("1.2.826.0.1.3680043.2.1125.1"),
            )
            .unwrap();
        file_obj.write_to_file(path).unwrap();
    }
}
