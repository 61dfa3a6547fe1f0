use dicom_core::Tag;
use dicom_object::InMemDicomObject;

/// Renders a tag's value as display text
///
/// Returns `None` if the tag is not present or its value has no text form.
/// Multi-valued elements are joined with `\`, sequences are summarized by
/// their item count. Surrounding whitespace and NUL padding are removed.
pub fn display_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    let elem = dcm.element(tag).ok()?;

    if let Some(items) = elem.items() {
        return Some(format!("[{} item(s)]", items.len()));
    }

    elem.to_str()
        .ok()
        .map(|s| s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string())
}
