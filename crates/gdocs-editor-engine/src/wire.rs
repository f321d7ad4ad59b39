//! JSON shapes of the Google Docs REST API.
//!
//! Only the parts the engine needs are decoded: the title, each body element's
//! `endIndex`, and the text of paragraph text runs. Everything else becomes an
//! opaque element so its index width is still accounted for.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{DocumentSnapshot, NativeRange, StructuralElement};
use crate::editing::{EditOperation, TextStyle, style::fields_mask};
use crate::service::ServiceError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    title: String,
    body: Option<RawBody>,
}

#[derive(Debug, Deserialize)]
struct RawBody {
    #[serde(default)]
    content: Vec<RawStructuralElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStructuralElement {
    #[serde(default)]
    end_index: usize,
    paragraph: Option<RawParagraph>,
}

#[derive(Debug, Deserialize)]
struct RawParagraph {
    #[serde(default)]
    elements: Vec<RawParagraphElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParagraphElement {
    #[serde(default)]
    end_index: usize,
    text_run: Option<RawTextRun>,
}

#[derive(Debug, Deserialize)]
struct RawTextRun {
    #[serde(default)]
    content: String,
}

/// Decode a `documents.get` response body.
///
/// Inline objects inside a paragraph (images, chips, ...) occupy native
/// indices without text. They are lifted out as opaque elements, splitting
/// the paragraph around them, so later text keeps its correct position.
pub fn decode_document(json: &str) -> Result<DocumentSnapshot, ServiceError> {
    let raw: RawDocument =
        serde_json::from_str(json).map_err(|e| ServiceError::Decode(e.to_string()))?;

    let mut content = Vec::new();
    for element in raw.body.map(|body| body.content).unwrap_or_default() {
        let Some(paragraph) = element.paragraph else {
            content.push(StructuralElement::opaque(element.end_index));
            continue;
        };

        let mut runs: Vec<String> = Vec::new();
        let mut runs_end = 0;
        for child in paragraph.elements {
            match child.text_run {
                Some(run) => {
                    runs.push(run.content);
                    runs_end = child.end_index;
                }
                None => {
                    if !runs.is_empty() {
                        content.push(StructuralElement::paragraph(
                            std::mem::take(&mut runs),
                            runs_end,
                        ));
                    }
                    content.push(StructuralElement::opaque(child.end_index));
                }
            }
        }
        content.push(StructuralElement::paragraph(runs, element.end_index));
    }

    Ok(DocumentSnapshot::new(raw.title, content))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Range {
    start_index: usize,
    end_index: usize,
}

impl From<NativeRange> for Range {
    fn from(range: NativeRange) -> Self {
        Self {
            start_index: range.start,
            end_index: range.end,
        }
    }
}

#[derive(Serialize)]
struct Location {
    index: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Request<'a> {
    DeleteContentRange {
        range: Range,
    },
    InsertText {
        location: Location,
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    UpdateTextStyle {
        range: Range,
        text_style: &'a TextStyle,
        fields: String,
    },
}

#[derive(Serialize)]
struct BatchUpdate<'a> {
    requests: Vec<Request<'a>>,
}

impl<'a> From<&'a EditOperation> for Request<'a> {
    fn from(operation: &'a EditOperation) -> Self {
        match operation {
            EditOperation::DeleteRange { range } => Request::DeleteContentRange {
                range: (*range).into(),
            },
            EditOperation::InsertText { at, text } => Request::InsertText {
                location: Location { index: *at },
                text,
            },
            EditOperation::UpdateStyle {
                range,
                style,
                fields,
            } => Request::UpdateTextStyle {
                range: (*range).into(),
                text_style: style,
                fields: fields_mask(fields),
            },
        }
    }
}

/// Encode a batch as a `documents.batchUpdate` request body.
pub fn encode_batch_update(edits: &[EditOperation]) -> Value {
    let body = BatchUpdate {
        requests: edits.iter().map(Request::from).collect(),
    };
    serde_json::to_value(body).unwrap_or(Value::Null)
}

/// Extract `error.message` from an API error response, if present.
pub fn decode_error_message(json: &str) -> Option<String> {
    let value: Value = serde_json::from_str(json).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{StyleRequest, build_style, linearize};
    use pretty_assertions::assert_eq;

    const HELLO_DOCUMENT: &str = r#"{
        "documentId": "abc",
        "title": "Greeting",
        "body": {
            "content": [
                { "endIndex": 1, "sectionBreak": { "sectionStyle": {} } },
                {
                    "startIndex": 1,
                    "endIndex": 13,
                    "paragraph": {
                        "elements": [
                            { "startIndex": 1, "endIndex": 7, "textRun": { "content": "Hello ", "textStyle": {} } },
                            { "startIndex": 7, "endIndex": 13, "textRun": { "content": "World\n", "textStyle": { "bold": true } } }
                        ],
                        "paragraphStyle": { "namedStyleType": "NORMAL_TEXT" }
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn test_decode_paragraph_document() {
        let snapshot = decode_document(HELLO_DOCUMENT).unwrap();

        assert_eq!(
            snapshot,
            DocumentSnapshot::new(
                "Greeting",
                vec![
                    StructuralElement::opaque(1),
                    StructuralElement::paragraph(["Hello ", "World\n"], 13),
                ]
            )
        );
    }

    #[test]
    fn test_decode_document_without_body() {
        let snapshot = decode_document(r#"{ "title": "Blank" }"#).unwrap();

        assert_eq!(snapshot.title, "Blank");
        assert!(snapshot.content.is_empty());
    }

    #[test]
    fn test_decode_tables_as_opaque() {
        let json = r#"{
            "title": "T",
            "body": { "content": [
                { "endIndex": 1, "sectionBreak": {} },
                { "startIndex": 1, "endIndex": 4, "paragraph": { "elements": [
                    { "startIndex": 1, "endIndex": 4, "textRun": { "content": "ab\n" } }
                ] } },
                { "startIndex": 4, "endIndex": 20, "table": { "rows": 1, "columns": 1 } },
                { "startIndex": 20, "endIndex": 24, "paragraph": { "elements": [
                    { "startIndex": 20, "endIndex": 24, "textRun": { "content": "end\n" } }
                ] } }
            ] }
        }"#;

        let snapshot = decode_document(json).unwrap();

        assert_eq!(snapshot.content[2], StructuralElement::opaque(20));
        assert_eq!(linearize(&snapshot).text(), "ab\nend\n");
    }

    #[test]
    fn test_inline_objects_split_paragraphs() {
        let json = r#"{
            "title": "T",
            "body": { "content": [
                { "startIndex": 1, "endIndex": 8, "paragraph": { "elements": [
                    { "startIndex": 1, "endIndex": 3, "textRun": { "content": "ab" } },
                    { "startIndex": 3, "endIndex": 4, "inlineObjectElement": { "inlineObjectId": "img" } },
                    { "startIndex": 4, "endIndex": 8, "textRun": { "content": "cde\n" } }
                ] } }
            ] }
        }"#;

        let snapshot = decode_document(json).unwrap();
        let flat = linearize(&snapshot);

        assert_eq!(
            snapshot.content,
            vec![
                StructuralElement::paragraph(["ab"], 3),
                StructuralElement::opaque(4),
                StructuralElement::paragraph(["cde\n"], 8),
            ]
        );
        assert_eq!(flat.text(), "abcde\n");
        assert_eq!(flat.native_range(2, 5), NativeRange::new(4, 7));
    }

    #[test]
    fn test_malformed_json_is_a_decode_error() {
        assert!(matches!(
            decode_document("not json"),
            Err(ServiceError::Decode(_))
        ));
    }

    #[test]
    fn test_encode_replace_all_batch() {
        let edits = vec![
            EditOperation::DeleteRange {
                range: NativeRange::new(1, 12),
            },
            EditOperation::InsertText {
                at: 1,
                text: "New body".to_string(),
            },
        ];

        assert_eq!(
            encode_batch_update(&edits),
            serde_json::json!({
                "requests": [
                    { "deleteContentRange": { "range": { "startIndex": 1, "endIndex": 12 } } },
                    { "insertText": { "location": { "index": 1 }, "text": "New body" } }
                ]
            })
        );
    }

    #[test]
    fn test_encode_style_update() {
        let update = build_style(&StyleRequest {
            italic: Some(false),
            font_size_pt: Some(18.0),
            foreground_color_hex: Some("#FF0000".to_string()),
            ..Default::default()
        })
        .unwrap();
        let edits = vec![EditOperation::UpdateStyle {
            range: NativeRange::new(7, 12),
            style: update.style,
            fields: update.fields,
        }];

        assert_eq!(
            encode_batch_update(&edits),
            serde_json::json!({
                "requests": [{
                    "updateTextStyle": {
                        "range": { "startIndex": 7, "endIndex": 12 },
                        "textStyle": {
                            "italic": false,
                            "fontSize": { "magnitude": 18.0, "unit": "PT" },
                            "foregroundColor": {
                                "color": { "rgbColor": { "red": 1.0, "green": 0.0, "blue": 0.0 } }
                            }
                        },
                        "fields": "italic,fontSize,foregroundColor"
                    }
                }]
            })
        );
    }

    #[test]
    fn test_decode_error_message() {
        let body = r#"{ "error": { "code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND" } }"#;

        assert_eq!(
            decode_error_message(body).as_deref(),
            Some("Requested entity was not found.")
        );
        assert_eq!(decode_error_message("<html>"), None);
    }
}
