//! Field extraction from the free text of a sealed page.
//!
//! Both patterns scan the same text independently and the first match in
//! document order wins. Labels fold case in ASCII only and digits are ASCII
//! only, so Unicode digits or look-alike letters never parse as seal fields.
//! Labels need no word boundary: `pdftotext` may join adjacent text runs, as
//! in `RidersRID:104SHA256:...`.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{FieldParseFailure, SealFields};

/// `RID`, optional separators, then 2-6 digits.
static RIDER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u:rid)[\s:#=.\-]*([0-9]{2,6})").unwrap());

/// `SHA256` (or `SHA-256`), optional separators, then 16+ hex digits.
static SEAL_HASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u:sha-?256)[\s:#=.\-]*([0-9a-fA-F]{16,})").unwrap()
});

/// Parse both seal fields, identifier first.
pub fn parse_fields(text: &str) -> Result<SealFields, FieldParseFailure> {
    let rider_id = parse_rider_id(text).ok_or(FieldParseFailure::MissingId)?;
    let hash = parse_seal_hash(text).ok_or(FieldParseFailure::MissingHash { rider_id })?;
    Ok(SealFields { rider_id, hash })
}

/// First printed rider identifier. Zero is not a rider.
pub fn parse_rider_id(text: &str) -> Option<i64> {
    let digits = RIDER_ID.captures(text)?.get(1)?.as_str();
    match digits.parse::<i64>() {
        Ok(id) if id > 0 => Some(id),
        _ => None,
    }
}

/// First printed digest, lowercased.
pub fn parse_seal_hash(text: &str) -> Option<String> {
    let hex = SEAL_HASH.captures(text)?.get(1)?.as_str();
    Some(hex.to_ascii_lowercase())
}
