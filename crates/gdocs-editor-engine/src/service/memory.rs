use std::collections::HashMap;
use std::sync::Mutex;

use crate::document::{DOCUMENT_START, DocumentSnapshot, NativeRange, utf16_len};
use crate::editing::{EditOperation, StyleField, TextStyle};
use crate::service::{DocumentService, ServiceError};

/// A style update recorded by [`InMemoryDocumentService`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedStyle {
    pub range: NativeRange,
    pub style: TextStyle,
    pub fields: Vec<StyleField>,
}

/// A plain-text document held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub title: String,
    /// Body text; always ends with the trailing newline.
    pub body: String,
    /// Style updates in the order they were applied. Ranges are recorded as
    /// submitted and are not shifted by later edits.
    pub styles: Vec<AppliedStyle>,
    pub read_only: bool,
}

impl StoredDocument {
    fn new(title: &str, body: &str) -> Self {
        let mut body = body.to_string();
        if !body.ends_with('\n') {
            body.push('\n');
        }
        Self {
            title: title.to_string(),
            body,
            styles: Vec::new(),
            read_only: false,
        }
    }

    fn end_index(&self) -> usize {
        utf16_len(&self.body) + DOCUMENT_START
    }

    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot::from_plain_text(self.title.clone(), &self.body)
    }

    fn apply(&mut self, operation: &EditOperation) -> Result<(), ServiceError> {
        let end_index = self.end_index();
        match operation {
            EditOperation::DeleteRange { range } => {
                if range.is_empty() {
                    return Err(invalid("the deletion range should not be empty"));
                }
                if range.start < DOCUMENT_START || range.end > end_index - 1 {
                    return Err(invalid(format!(
                        "deletion range {}..{} must lie within 1..{} and may not include the final newline",
                        range.start,
                        range.end,
                        end_index - 1
                    )));
                }
                let start = byte_offset(&self.body, range.start)?;
                let end = byte_offset(&self.body, range.end)?;
                self.body.replace_range(start..end, "");
            }
            EditOperation::InsertText { at, text } => {
                if *at < DOCUMENT_START || *at > end_index - 1 {
                    return Err(invalid(format!(
                        "insertion index {at} must lie within 1..={}",
                        end_index - 1
                    )));
                }
                let offset = byte_offset(&self.body, *at)?;
                self.body.insert_str(offset, text);
            }
            EditOperation::UpdateStyle {
                range,
                style,
                fields,
            } => {
                if range.is_empty() || range.start < DOCUMENT_START || range.end > end_index {
                    return Err(invalid(format!(
                        "style range {}..{} must be non-empty and lie within 1..{end_index}",
                        range.start, range.end
                    )));
                }
                if fields.is_empty() {
                    return Err(invalid("at least one field must be listed"));
                }
                byte_offset(&self.body, range.start)?;
                byte_offset(&self.body, range.end)?;
                self.styles.push(AppliedStyle {
                    range: *range,
                    style: style.clone(),
                    fields: fields.clone(),
                });
            }
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ServiceError {
    ServiceError::InvalidRequest(message.into())
}

/// Byte offset in `body` of the native index `index`.
///
/// Fails when the index points into the middle of a surrogate pair or past
/// the end of the body.
fn byte_offset(body: &str, index: usize) -> Result<usize, ServiceError> {
    let target = index.saturating_sub(DOCUMENT_START);
    let mut units = 0;
    for (byte, ch) in body.char_indices() {
        if units == target {
            return Ok(byte);
        }
        if units > target {
            break;
        }
        units += ch.len_utf16();
    }
    if units == target {
        return Ok(body.len());
    }
    Err(invalid(format!(
        "index {index} does not fall on a character boundary"
    )))
}

/// A [`DocumentService`] over plain-text documents kept in memory.
///
/// Batches are atomic: operations apply in order to a working copy, and the
/// copy replaces the stored document only if every operation succeeds.
/// Invalid ranges are rejected the way the remote service rejects them.
#[derive(Debug, Default)]
pub struct InMemoryDocumentService {
    documents: Mutex<HashMap<String, StoredDocument>>,
}

impl InMemoryDocumentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, document_id: &str, title: &str, body: &str) -> Self {
        self.insert(document_id, title, body);
        self
    }

    /// Add or replace a document. A missing final newline is supplied.
    pub fn insert(&self, document_id: &str, title: &str, body: &str) {
        self.lock()
            .insert(document_id.to_string(), StoredDocument::new(title, body));
    }

    pub fn document(&self, document_id: &str) -> Option<StoredDocument> {
        self.lock().get(document_id).cloned()
    }

    pub fn body(&self, document_id: &str) -> Option<String> {
        self.lock().get(document_id).map(|doc| doc.body.clone())
    }

    /// Refuse all future edits to `document_id`, as for a viewer-only grant.
    pub fn set_read_only(&self, document_id: &str, read_only: bool) {
        if let Some(doc) = self.lock().get_mut(document_id) {
            doc.read_only = read_only;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredDocument>> {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentService for InMemoryDocumentService {
    async fn fetch_document(&self, document_id: &str) -> Result<DocumentSnapshot, ServiceError> {
        self.lock()
            .get(document_id)
            .map(StoredDocument::snapshot)
            .ok_or_else(|| ServiceError::NotFound(document_id.to_string()))
    }

    async fn apply_edits(
        &self,
        document_id: &str,
        edits: &[EditOperation],
    ) -> Result<(), ServiceError> {
        let mut documents = self.lock();
        let stored = documents
            .get_mut(document_id)
            .ok_or_else(|| ServiceError::NotFound(document_id.to_string()))?;
        if stored.read_only {
            return Err(ServiceError::Unauthorized(format!(
                "document {document_id} is read-only"
            )));
        }

        let mut working = stored.clone();
        for edit in edits {
            working.apply(edit)?;
        }
        log::debug!("applied {} edit(s) to {document_id}", edits.len());
        *stored = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::style::{StyleRequest, build_style};
    use pretty_assertions::assert_eq;

    fn service() -> InMemoryDocumentService {
        InMemoryDocumentService::new().with_document("doc", "Title", "Hello World\n")
    }

    fn insert(at: usize, text: &str) -> EditOperation {
        EditOperation::InsertText {
            at,
            text: text.to_string(),
        }
    }

    fn delete(start: usize, end: usize) -> EditOperation {
        EditOperation::DeleteRange {
            range: NativeRange::new(start, end),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_plain_text_snapshot() {
        let snapshot = service().fetch_document("doc").await.unwrap();

        assert_eq!(
            snapshot,
            DocumentSnapshot::from_plain_text("Title", "Hello World\n")
        );
    }

    #[tokio::test]
    async fn test_fetch_unknown_document() {
        let result = service().fetch_document("missing").await;
        assert_eq!(result, Err(ServiceError::NotFound("missing".to_string())));
    }

    #[tokio::test]
    async fn test_insert_document_supplies_trailing_newline() {
        let service = InMemoryDocumentService::new().with_document("d", "T", "no newline");
        assert_eq!(service.body("d").as_deref(), Some("no newline\n"));
    }

    #[tokio::test]
    async fn test_operations_apply_in_order() {
        let service = service();
        service
            .apply_edits("doc", &[delete(1, 7), insert(1, "Big ")])
            .await
            .unwrap();

        assert_eq!(service.body("doc").as_deref(), Some("Big World\n"));
    }

    #[tokio::test]
    async fn test_cannot_delete_trailing_newline() {
        let service = service();
        let result = service.apply_edits("doc", &[delete(1, 13)]).await;

        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
        assert_eq!(service.body("doc").as_deref(), Some("Hello World\n"));
    }

    #[tokio::test]
    async fn test_empty_delete_is_rejected() {
        let result = service().apply_edits("doc", &[delete(3, 3)]).await;
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_insert_outside_body_is_rejected() {
        let service = service();
        assert!(service.apply_edits("doc", &[insert(0, "x")]).await.is_err());
        assert!(service.apply_edits("doc", &[insert(13, "x")]).await.is_err());
        assert!(service.apply_edits("doc", &[insert(12, "x")]).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_document_untouched() {
        let service = service();
        let result = service
            .apply_edits("doc", &[insert(1, "ok "), delete(1, 100)])
            .await;

        assert!(result.is_err());
        assert_eq!(service.body("doc").as_deref(), Some("Hello World\n"));
    }

    #[tokio::test]
    async fn test_index_inside_surrogate_pair_is_rejected() {
        let service = InMemoryDocumentService::new().with_document("d", "T", "😀\n");
        let result = service.apply_edits("d", &[insert(2, "x")]).await;

        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
        service.apply_edits("d", &[insert(3, "x")]).await.unwrap();
        assert_eq!(service.body("d").as_deref(), Some("😀x\n"));
    }

    #[tokio::test]
    async fn test_style_updates_are_recorded() {
        let service = service();
        let update = build_style(&StyleRequest {
            bold: Some(true),
            ..Default::default()
        })
        .unwrap();
        let edit = EditOperation::UpdateStyle {
            range: NativeRange::new(7, 12),
            style: update.style.clone(),
            fields: update.fields.clone(),
        };

        service.apply_edits("doc", &[edit]).await.unwrap();

        let stored = service.document("doc").unwrap();
        assert_eq!(
            stored.styles,
            vec![AppliedStyle {
                range: NativeRange::new(7, 12),
                style: update.style,
                fields: update.fields,
            }]
        );
        assert_eq!(stored.body, "Hello World\n");
    }

    #[tokio::test]
    async fn test_read_only_document_refuses_edits() {
        let service = service();
        service.set_read_only("doc", true);

        let result = service.apply_edits("doc", &[insert(1, "x")]).await;

        assert_eq!(
            result,
            Err(ServiceError::Unauthorized(
                "document doc is read-only".to_string()
            ))
        );
    }
}
