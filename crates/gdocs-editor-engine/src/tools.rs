//! The five remote-callable operations.
//!
//! Every call fetches its own snapshot and submits at most one batch; nothing
//! is shared between calls, so concurrent calls on the same document follow
//! last-writer-wins.

use crate::document::DocumentSnapshot;
use crate::editing::{
    Batch, EditIntent, EditOperation, PlanError, StyleRequest, linearize, plan,
};
use crate::error::{Operation, ToolError};
use crate::format;
use crate::service::DocumentService;

pub struct DocumentTools<S> {
    service: S,
}

impl<S: DocumentService> DocumentTools<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// `get_title`: the document's title.
    pub async fn get_title(&self, document_id: &str) -> Result<String, ToolError> {
        let snapshot = self.fetch(Operation::GetTitle, document_id).await?;
        Ok(format::title(&snapshot))
    }

    /// `update_document_content`: replace the whole body with `new_content`.
    pub async fn update_document_content(
        &self,
        document_id: &str,
        new_content: &str,
    ) -> Result<String, ToolError> {
        let operation = Operation::UpdateDocumentContent;
        let intent = EditIntent::ReplaceAll(new_content.to_string());
        self.edit(operation, document_id, &intent).await?;
        Ok(format::content_updated(document_id))
    }

    /// `append_to_document`: add `text` on a new line after existing content.
    pub async fn append_to_document(
        &self,
        document_id: &str,
        text_to_append: &str,
    ) -> Result<String, ToolError> {
        let operation = Operation::AppendToDocument;
        let intent = EditIntent::Append(text_to_append.to_string());
        self.edit(operation, document_id, &intent).await?;
        Ok(format::text_appended(document_id))
    }

    /// `read_document`: the flattened text, or a fallback message.
    pub async fn read_document(&self, document_id: &str) -> Result<String, ToolError> {
        let snapshot = self.fetch(Operation::ReadDocument, document_id).await?;
        Ok(format::read_text(&snapshot))
    }

    /// `format_text`: style the first occurrence of `text_to_find`.
    pub async fn format_text(
        &self,
        document_id: &str,
        text_to_find: &str,
        style: &StyleRequest,
    ) -> Result<String, ToolError> {
        let intent = EditIntent::Restyle {
            needle: text_to_find.to_string(),
            style: style.clone(),
        };
        let batch = self.edit(Operation::FormatText, document_id, &intent).await?;

        let fields = batch
            .operations()
            .iter()
            .find_map(|op| match op {
                EditOperation::UpdateStyle { fields, .. } => Some(fields.as_slice()),
                _ => None,
            })
            .unwrap_or_default();
        Ok(format::text_formatted(document_id, text_to_find, fields))
    }

    async fn fetch(
        &self,
        operation: Operation,
        document_id: &str,
    ) -> Result<DocumentSnapshot, ToolError> {
        log::debug!("{}: fetching {document_id}", operation.name());
        self.service
            .fetch_document(document_id)
            .await
            .map_err(ToolError::service(operation))
    }

    /// Fetch, plan against that one snapshot, and submit the batch.
    async fn edit(
        &self,
        operation: Operation,
        document_id: &str,
        intent: &EditIntent,
    ) -> Result<Batch, ToolError> {
        let snapshot = self.fetch(operation, document_id).await?;
        let flat = linearize(&snapshot);

        let batch = plan(&flat, intent).map_err(|error| match error {
            PlanError::TextNotFound { needle } => ToolError::TextNotFound {
                document_id: document_id.to_string(),
                needle,
            },
            PlanError::NoFormatSpecified => ToolError::NoFormatSpecified,
        })?;

        log::info!(
            "{}: submitting {} operation(s) to {document_id}",
            operation.name(),
            batch.len()
        );
        self.service
            .apply_edits(document_id, batch.operations())
            .await
            .map_err(ToolError::service(operation))?;
        Ok(batch)
    }
}
