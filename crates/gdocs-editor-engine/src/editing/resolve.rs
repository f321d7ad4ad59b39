use crate::document::{NativeRange, utf16_len};
use crate::editing::FlatText;

/// Locate the first occurrence of `needle` and return its native range.
///
/// Matching is literal and case-sensitive. Only the first occurrence can be
/// addressed; later repeats of the same text are never returned. An empty
/// needle never matches.
pub fn find_range(flat: &FlatText, needle: &str) -> Option<NativeRange> {
    if needle.is_empty() {
        return None;
    }

    let byte_start = flat.text().find(needle)?;
    let flat_start = utf16_len(&flat.text()[..byte_start]);
    let flat_end = flat_start + utf16_len(needle);

    Some(flat.native_range(flat_start, flat_end))
}
