use crate::service::ServiceError;

/// The five remote-callable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetTitle,
    UpdateDocumentContent,
    AppendToDocument,
    ReadDocument,
    FormatText,
}

impl Operation {
    /// Tool name as exposed to callers.
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetTitle => "get_title",
            Operation::UpdateDocumentContent => "update_document_content",
            Operation::AppendToDocument => "append_to_document",
            Operation::ReadDocument => "read_document",
            Operation::FormatText => "format_text",
        }
    }

    /// Fixed prefix for collaborator failures during this operation.
    pub fn error_prefix(self) -> &'static str {
        match self {
            Operation::GetTitle => "Error fetching document title",
            Operation::UpdateDocumentContent => "Error updating document",
            Operation::AppendToDocument => "Error appending to document",
            Operation::ReadDocument => "Error reading document",
            Operation::FormatText => "Error formatting text",
        }
    }
}

/// Outcome of a failed operation, worded for the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// Fetching or applying failed on the remote service.
    #[error("{}: {}", .operation.error_prefix(), .source)]
    Service {
        operation: Operation,
        source: ServiceError,
    },
    #[error("Text \"{needle}\" not found in document {document_id}")]
    TextNotFound { document_id: String, needle: String },
    #[error(
        "No format specified: provide at least one of bold, italic, underline, fontSize, fontFamily or foregroundColor"
    )]
    NoFormatSpecified,
}

impl ToolError {
    pub fn service(operation: Operation) -> impl FnOnce(ServiceError) -> ToolError {
        move |source| ToolError::Service { operation, source }
    }

    /// True for errors caused by the request itself rather than the service.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ToolError::Service { .. })
    }
}
