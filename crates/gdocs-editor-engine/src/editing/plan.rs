use crate::document::{DOCUMENT_START, NativeRange};
use crate::editing::style::{StyleField, StyleRequest, TextStyle, build_style};
use crate::editing::{FlatText, find_range};

/// A primitive mutation in native index space.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOperation {
    DeleteRange {
        range: NativeRange,
    },
    InsertText {
        at: usize,
        text: String,
    },
    UpdateStyle {
        range: NativeRange,
        style: TextStyle,
        fields: Vec<StyleField>,
    },
}

/// What a caller wants done to a document.
#[derive(Debug, Clone, PartialEq)]
pub enum EditIntent {
    /// Replace the entire body with new text.
    ReplaceAll(String),
    /// Add text after the existing content, on a new line.
    Append(String),
    /// Apply a style to the first occurrence of `needle`.
    Restyle { needle: String, style: StyleRequest },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("text {needle:?} was not found")]
    TextNotFound { needle: String },
    #[error("no formatting fields were specified")]
    NoFormatSpecified,
}

/// Ordered operations for one call, all computed against the same snapshot.
///
/// Every range is taken from the pre-batch snapshot. Deletions of existing
/// content come before inserts that are only valid once that content is gone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    operations: Vec<EditOperation>,
}

impl Batch {
    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn into_operations(self) -> Vec<EditOperation> {
        self.operations
    }
}

impl From<Vec<EditOperation>> for Batch {
    fn from(operations: Vec<EditOperation>) -> Self {
        Self { operations }
    }
}

/// Plan the operations realizing `intent` against `flat`.
pub fn plan(flat: &FlatText, intent: &EditIntent) -> Result<Batch, PlanError> {
    let batch = match intent {
        EditIntent::ReplaceAll(text) => plan_replace_all(flat.end_index(), text),
        EditIntent::Append(text) => plan_append(flat.end_index(), text),
        EditIntent::Restyle { needle, style } => plan_restyle(flat, needle, style)?,
    };

    log::debug!(
        "planned {} operation(s) against end index {}",
        batch.len(),
        flat.end_index()
    );
    Ok(batch)
}

/// Delete all content except the trailing unit, then insert at the start.
///
/// The deletion is emitted only when it covers at least one unit: the
/// trailing unit at `end_index - 1` is structural and can never be deleted,
/// and the service rejects empty ranges.
pub fn plan_replace_all(end_index: usize, text: &str) -> Batch {
    let mut operations = Vec::with_capacity(2);

    let content = NativeRange::new(DOCUMENT_START, end_index.saturating_sub(1));
    if !content.is_empty() {
        operations.push(EditOperation::DeleteRange { range: content });
    }
    operations.push(EditOperation::InsertText {
        at: DOCUMENT_START,
        text: text.to_string(),
    });

    Batch::from(operations)
}

/// Insert `"\n" + text` immediately before the trailing unit.
///
/// The newline is prepended unconditionally, even for an empty document.
pub fn plan_append(end_index: usize, text: &str) -> Batch {
    let at = end_index.saturating_sub(1).max(DOCUMENT_START);
    Batch::from(vec![EditOperation::InsertText {
        at,
        text: format!("\n{text}"),
    }])
}

/// Style the first occurrence of `needle`.
pub fn plan_restyle(
    flat: &FlatText,
    needle: &str,
    request: &StyleRequest,
) -> Result<Batch, PlanError> {
    let range = find_range(flat, needle).ok_or_else(|| PlanError::TextNotFound {
        needle: needle.to_string(),
    })?;
    let update = build_style(request).ok_or(PlanError::NoFormatSpecified)?;

    Ok(Batch::from(vec![EditOperation::UpdateStyle {
        range,
        style: update.style,
        fields: update.fields,
    }]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentSnapshot, StructuralElement};
    use crate::editing::linearize;
    use pretty_assertions::assert_eq;

    fn flat(body: &str) -> FlatText {
        linearize(&DocumentSnapshot::from_plain_text("Doc", body))
    }

    #[test]
    fn test_replace_all_deletes_then_inserts() {
        let batch = plan(&flat("Hello World\n"), &EditIntent::ReplaceAll("Bye".into())).unwrap();

        assert_eq!(
            batch.operations(),
            &[
                EditOperation::DeleteRange {
                    range: NativeRange::new(1, 12)
                },
                EditOperation::InsertText {
                    at: 1,
                    text: "Bye".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_replace_all_on_truly_empty_document_only_inserts() {
        let batch = plan_replace_all(1, "hi");

        assert_eq!(
            batch.operations(),
            &[EditOperation::InsertText {
                at: 1,
                text: "hi".to_string()
            }]
        );
    }

    #[test]
    fn test_replace_all_skips_empty_delete_range() {
        // A document holding only its trailing newline has nothing to delete
        let batch = plan(&flat(""), &EditIntent::ReplaceAll("hi".into())).unwrap();

        assert_eq!(batch.len(), 1);
        assert!(matches!(
            batch.operations()[0],
            EditOperation::InsertText { at: 1, .. }
        ));
    }

    #[test]
    fn test_replace_all_uses_end_index_from_last_element() {
        let snapshot = DocumentSnapshot::new(
            "Doc",
            vec![
                StructuralElement::paragraph(["ab\n"], 4),
                StructuralElement::opaque(10),
                StructuralElement::paragraph(["\n"], 11),
            ],
        );
        let batch = plan(&linearize(&snapshot), &EditIntent::ReplaceAll(String::new())).unwrap();

        assert_eq!(
            batch.operations()[0],
            EditOperation::DeleteRange {
                range: NativeRange::new(1, 10)
            }
        );
    }

    #[test]
    fn test_append_inserts_before_trailing_unit_with_newline() {
        let batch = plan(&flat("Hello\n"), &EditIntent::Append("More".into())).unwrap();

        assert_eq!(
            batch.operations(),
            &[EditOperation::InsertText {
                at: 6,
                text: "\nMore".to_string()
            }]
        );
    }

    #[test]
    fn test_append_to_empty_document_still_prepends_newline() {
        let batch = plan(&flat(""), &EditIntent::Append("first".into())).unwrap();

        assert_eq!(
            batch.operations(),
            &[EditOperation::InsertText {
                at: 1,
                text: "\nfirst".to_string()
            }]
        );
    }

    #[test]
    fn test_append_without_any_elements_targets_document_start() {
        let batch = plan_append(1, "x");

        assert_eq!(
            batch.operations(),
            &[EditOperation::InsertText {
                at: 1,
                text: "\nx".to_string()
            }]
        );
    }

    #[test]
    fn test_restyle_targets_found_range() {
        let request = StyleRequest {
            bold: Some(true),
            ..Default::default()
        };
        let batch = plan(
            &flat("Hello World\n"),
            &EditIntent::Restyle {
                needle: "World".into(),
                style: request,
            },
        )
        .unwrap();

        let [EditOperation::UpdateStyle { range, fields, style }] = batch.operations() else {
            panic!("expected a single style update, got {batch:?}");
        };
        assert_eq!(*range, NativeRange::new(7, 12));
        assert_eq!(fields, &vec![StyleField::Bold]);
        assert_eq!(style.bold, Some(true));
    }

    #[test]
    fn test_restyle_missing_text_is_not_found() {
        let result = plan_restyle(
            &flat("Hello\n"),
            "World",
            &StyleRequest {
                bold: Some(true),
                ..Default::default()
            },
        );

        assert_eq!(
            result,
            Err(PlanError::TextNotFound {
                needle: "World".to_string()
            })
        );
    }

    #[test]
    fn test_restyle_without_fields_is_rejected() {
        let result = plan_restyle(&flat("Hello\n"), "Hello", &StyleRequest::default());
        assert_eq!(result, Err(PlanError::NoFormatSpecified));
    }

    #[test]
    fn test_restyle_not_found_wins_over_empty_style() {
        let result = plan_restyle(&flat("Hello\n"), "nope", &StyleRequest::default());
        assert!(matches!(result, Err(PlanError::TextNotFound { .. })));
    }
}
