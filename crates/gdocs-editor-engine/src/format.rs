//! Human-readable results for the five operations.

use crate::document::DocumentSnapshot;
use crate::editing::{StyleField, linearize};

pub const EMPTY_DOCUMENT: &str = "Document is empty.";
pub const NO_VISIBLE_TEXT: &str = "Document has no visible text.";

/// Flat text of the snapshot, or a fallback message.
///
/// A body with no structural elements and a body whose text is only
/// whitespace are reported differently.
pub fn read_text(snapshot: &DocumentSnapshot) -> String {
    if snapshot.content.is_empty() {
        return EMPTY_DOCUMENT.to_string();
    }

    let flat = linearize(snapshot);
    if flat.text().trim().is_empty() {
        return NO_VISIBLE_TEXT.to_string();
    }
    flat.text().to_string()
}

pub fn title(snapshot: &DocumentSnapshot) -> String {
    snapshot.title.clone()
}

pub fn content_updated(document_id: &str) -> String {
    format!("Document {document_id} updated successfully.")
}

pub fn text_appended(document_id: &str) -> String {
    format!("Text appended to document {document_id}.")
}

pub fn text_formatted(document_id: &str, needle: &str, fields: &[StyleField]) -> String {
    let names = fields
        .iter()
        .map(|field| field.path())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Applied formatting ({names}) to \"{needle}\" in document {document_id}.")
}
