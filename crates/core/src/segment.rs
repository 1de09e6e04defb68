//! Permission string segments.
//!
//! A permission string is a `:`-joined list of segments. Segment values must
//! never contain the separator, otherwise two different triples could encode
//! to the same string.

use crate::error::{DomainError, DomainResult};

/// Separator between the action, resource and scope segments.
pub const SEPARATOR: char = ':';

/// Check that `value` can be used as a segment.
///
/// `kind` names the segment ("action", "resource", "scope") in the error.
pub fn validate_segment(kind: &str, value: &str) -> DomainResult<()> {
    if value.is_empty() {
        return Err(DomainError::validation(format!("{kind} must not be empty")));
    }
    if value.contains(SEPARATOR) {
        return Err(DomainError::validation(format!(
            "{kind} '{value}' must not contain '{SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Join segments with the canonical separator.
pub fn join<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(segment);
    }
    out
}
