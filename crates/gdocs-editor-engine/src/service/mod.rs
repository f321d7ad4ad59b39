//! The remote document service as seen by the engine.
//!
//! Credentials, transport and retries all live behind [`DocumentService`];
//! the engine only fetches snapshots and submits batches.

use std::future::Future;

use crate::document::DocumentSnapshot;
use crate::editing::EditOperation;

pub mod memory;

pub use memory::{AppliedStyle, InMemoryDocumentService, StoredDocument};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("document {0} was not found")]
    NotFound(String),
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("{0}")]
    Transport(String),
}

/// Fetch and mutate documents on the remote service.
///
/// `apply_edits` submits the whole slice as one atomic batch, applied in
/// order. Implementations never retry on their own.
pub trait DocumentService {
    fn fetch_document(
        &self,
        document_id: &str,
    ) -> impl Future<Output = Result<DocumentSnapshot, ServiceError>> + Send;

    fn apply_edits(
        &self,
        document_id: &str,
        edits: &[EditOperation],
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
