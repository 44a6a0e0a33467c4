// Document operations: create, update, trash.
//
// Each operation checks its required identifier, makes the store calls it
// needs, and turns the store's answer into a plain record. Store faults are
// passed through untouched; translating them for clients is the dispatcher's
// job.

use chrono::{SecondsFormat, Utc};
use thiserror::Error;

use super::document_models::{DeleteResult, DocumentRecord, UpdateResult};
use super::document_store::{DocumentStore, StoreError};

pub const DELETE_SUCCESS_MESSAGE: &str = "Document deleted successfully";

#[derive(Debug, Error)]
pub enum DocumentError {
    /// A required field was missing or empty. No store call was made.
    #[error("{0}")]
    InvalidArgument(&'static str),

    #[error(transparent)]
    Upstream(#[from] StoreError),
}

/// Presence check: absent and empty both fail with `message`.
fn require<'a>(value: Option<&'a str>, message: &'static str) -> Result<&'a str, DocumentError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DocumentError::InvalidArgument(message)),
    }
}

pub struct DocumentService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> DocumentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a document and, when `content` is non-empty, writes it as the
    /// body.
    pub async fn create(
        &self,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<DocumentRecord, DocumentError> {
        let title = require(title, "Title is required")?;

        let doc = self.store.create_document(title).await?;

        if let Some(content) = content.filter(|c| !c.is_empty()) {
            self.store.set_body_text(&doc.id, content).await?;
        }

        Ok(DocumentRecord {
            document_id: doc.id,
            title: doc.name,
            url: doc.url,
        })
    }

    /// Opens a document and overwrites its body when `content` is present.
    ///
    /// `Some("")` clears the body; `None` leaves it untouched.
    pub async fn update(
        &self,
        document_id: Option<&str>,
        content: Option<&str>,
    ) -> Result<UpdateResult, DocumentError> {
        let document_id = require(document_id, "Document ID is required")?;

        let doc = self.store.open_document(document_id).await?;

        if let Some(content) = content {
            self.store.set_body_text(&doc.id, content).await?;
        }

        Ok(UpdateResult {
            document_id: doc.id,
            title: doc.name,
            last_modified: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Moves a document to the trash.
    pub async fn delete(&self, document_id: Option<&str>) -> Result<DeleteResult, DocumentError> {
        let document_id = require(document_id, "Document ID is required")?;

        self.store.trash_file(document_id).await?;

        Ok(DeleteResult {
            message: DELETE_SUCCESS_MESSAGE.to_string(),
            document_id: document_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::documents::test_support::{RecordingStore, StoreCall};
    use chrono::DateTime;
    use std::sync::Arc;

    fn make_service() -> (DocumentService<Arc<RecordingStore>>, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::new());
        (DocumentService::new(Arc::clone(&store)), store)
    }

    #[test]
    fn require_rejects_absent_and_empty() {
        assert_eq!(require(Some("abc"), "needed").unwrap(), "abc");
        assert!(matches!(
            require(Some(""), "needed"),
            Err(DocumentError::InvalidArgument("needed"))
        ));
        assert!(matches!(
            require(None, "needed"),
            Err(DocumentError::InvalidArgument("needed"))
        ));
    }

    #[tokio::test]
    async fn create_without_title_never_reaches_store() {
        let (service, store) = make_service();

        for title in [None, Some("")] {
            let err = service.create(title, Some("body")).await.unwrap_err();
            assert!(matches!(err, DocumentError::InvalidArgument(_)));
            assert_eq!(err.to_string(), "Title is required");
        }

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn create_sets_content_when_given() {
        let (service, store) = make_service();

        let record = service.create(Some("T"), Some("C")).await.unwrap();

        assert_eq!(record.title, "T");
        assert_eq!(record.document_id, "doc-1");
        assert_eq!(record.url, "https://docs.example/doc-1");
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Create("T".into()),
                StoreCall::SetBodyText("doc-1".into(), "C".into()),
            ]
        );
    }

    #[tokio::test]
    async fn create_skips_empty_content() {
        let (service, store) = make_service();

        service.create(Some("T"), Some("")).await.unwrap();
        service.create(Some("U"), None).await.unwrap();

        assert_eq!(
            store.calls(),
            vec![StoreCall::Create("T".into()), StoreCall::Create("U".into())]
        );
    }

    #[tokio::test]
    async fn update_and_delete_require_document_id() {
        let (service, store) = make_service();

        for id in [None, Some("")] {
            let err = service.update(id, Some("x")).await.unwrap_err();
            assert_eq!(err.to_string(), "Document ID is required");

            let err = service.delete(id).await.unwrap_err();
            assert_eq!(err.to_string(), "Document ID is required");
        }

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn update_without_content_leaves_body_alone() {
        let (service, store) = make_service();

        let result = service.update(Some("123"), None).await.unwrap();

        assert_eq!(result.document_id, "123");
        assert_eq!(result.title, "Title of 123");
        assert_eq!(store.calls(), vec![StoreCall::Open("123".into())]);
    }

    #[tokio::test]
    async fn update_with_empty_content_clears_body() {
        let (service, store) = make_service();

        service.update(Some("123"), Some("")).await.unwrap();

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Open("123".into()),
                StoreCall::SetBodyText("123".into(), "".into()),
            ]
        );
    }

    #[tokio::test]
    async fn update_stamps_rfc3339_utc_time() {
        let (service, _store) = make_service();

        let result = service.update(Some("123"), None).await.unwrap();

        assert!(result.last_modified.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&result.last_modified).is_ok());
    }

    #[tokio::test]
    async fn delete_trashes_and_echoes_id() {
        let (service, store) = make_service();

        let result = service.delete(Some("123")).await.unwrap();

        assert_eq!(result.message, "Document deleted successfully");
        assert_eq!(result.document_id, "123");
        assert_eq!(store.calls(), vec![StoreCall::Trash("123".into())]);
    }

    #[tokio::test]
    async fn store_faults_propagate_unchanged() {
        let store = Arc::new(RecordingStore::failing());
        let service = DocumentService::new(Arc::clone(&store));

        let err = service.update(Some("missing"), None).await.unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Upstream(StoreError::Transport(_))
        ));

        // Exactly one attempt, no retry.
        assert_eq!(store.calls(), vec![StoreCall::Open("missing".into())]);
    }
}
