use crate::error::{DcmMergeError, Result};
use dicom_core::Tag;
use regex::Regex;
use std::sync::OnceLock;

/// Parses a field identifier of the form `(gggg,eeee)` into a DICOM tag
///
/// Accepts formats like:
/// - "(0010,0020)"
/// - "(0x0010, 0x0020)"
/// - "0010,0020" (parentheses are optional)
///
/// Hex digits are case-insensitive. Each component must fit in 16 bits.
///
/// # Errors
///
/// Returns [`DcmMergeError::FieldIdentifier`] if the string cannot be split
/// into exactly two hexadecimal tokens.
pub fn parse_tag_identifier(identifier: &str) -> Result<Tag> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^\(?\s*(?:0[xX])?([0-9A-Fa-f]+)\s*,\s*(?:0[xX])?([0-9A-Fa-f]+)\s*\)?$")
            .expect("Failed to compile regex")
    });

    let trimmed = identifier.trim();
    let caps = re
        .captures(trimmed)
        .ok_or_else(|| DcmMergeError::malformed(identifier, "expected two hex tokens"))?;

    let group = parse_component(identifier, &caps[1])?;
    let element = parse_component(identifier, &caps[2])?;

    Ok(Tag(group, element))
}

fn parse_component(identifier: &str, token: &str) -> Result<u16> {
    u16::from_str_radix(token, 16)
        .map_err(|e| DcmMergeError::malformed(identifier, format!("'{}': {}", token, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("(0010,0020)", Tag(0x0010, 0x0020))]
    #[case("(0008,103E)", Tag(0x0008, 0x103E))]
    #[case("(0008,103e)", Tag(0x0008, 0x103E))]
    #[case("(0x0018, 0x5101)", Tag(0x0018, 0x5101))]
    #[case("  (0020,000D)  ", Tag(0x0020, 0x000D))]
    #[case("0028,0010", Tag(0x0028, 0x0010))]
    #[case("(7FE0,0010)", Tag(0x7FE0, 0x0010))]
    fn test_parse_valid(#[case] input: &str, #[case] expected: Tag) {
        assert_eq!(parse_tag_identifier(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("()")]
    #[case("(0010)")]
    #[case("(0010,0020,0030)")]
    #[case("(00G0,0020)")]
    #[case("PatientID")]
    #[case("(10000,0010)")]
    fn test_parse_malformed(#[case] input: &str) {
        let err = parse_tag_identifier(input).unwrap_err();
        assert!(matches!(err, DcmMergeError::FieldIdentifier { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_error_keeps_identifier() {
        match parse_tag_identifier("(xyz,0010)") {
            Err(DcmMergeError::FieldIdentifier { identifier, .. }) => {
                assert_eq!(identifier, "(xyz,0010)")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
