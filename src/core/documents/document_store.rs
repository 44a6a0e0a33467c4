use super::document_models::StoredDocument;
use async_trait::async_trait;
use std::sync::Arc;

/// Any fault raised by the external store. The dispatch core treats every
/// variant the same way (a 500-class failure); the variants exist for logs.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Invalid document id: {0}")]
    InvalidId(String),
    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Credential error: {0}")]
    Credentials(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// The document-store primitives the core consumes.
///
/// Implementations make exactly one attempt per call and never retry.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates an empty document named `title`.
    async fn create_document(&self, title: &str) -> Result<StoredDocument, StoreError>;

    /// Resolves an existing document by id.
    async fn open_document(&self, document_id: &str) -> Result<StoredDocument, StoreError>;

    /// Replaces the whole body text. An empty `text` clears the body.
    async fn set_body_text(&self, document_id: &str, text: &str) -> Result<(), StoreError>;

    /// Moves the file to the trash. Never a hard delete.
    async fn trash_file(&self, document_id: &str) -> Result<(), StoreError>;
}

// Forwarding impl so `Arc<dyn DocumentStore>` (picked at runtime) and shared
// test stores can be injected.
#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn create_document(&self, title: &str) -> Result<StoredDocument, StoreError> {
        (**self).create_document(title).await
    }

    async fn open_document(&self, document_id: &str) -> Result<StoredDocument, StoreError> {
        (**self).open_document(document_id).await
    }

    async fn set_body_text(&self, document_id: &str, text: &str) -> Result<(), StoreError> {
        (**self).set_body_text(document_id, text).await
    }

    async fn trash_file(&self, document_id: &str) -> Result<(), StoreError> {
        (**self).trash_file(document_id).await
    }
}
