// In-memory implementation of DocumentStore, used for mock mode
// (`USE_REAL_BACKEND=false`).
//
// Ids are synthesized, so clients exercising a staging deployment get
// realistic-looking responses without touching anyone's Drive. Nothing
// survives a restart.

use async_trait::async_trait;
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::core::documents::{DocumentStore, StoreError, StoredDocument};
use crate::infra::google_docs::GoogleDocsStore;

const MOCK_ID_LENGTH: usize = 16;

#[derive(Clone, Debug)]
struct StoredEntry {
    title: String,
    body: String,
    trashed: bool,
}

pub struct InMemoryDocumentStore {
    /// Maps document id -> entry
    data: DashMap<String, StoredEntry>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    fn mock_id() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(MOCK_ID_LENGTH)
            .map(char::from)
            .collect();
        format!("mock-{}", suffix)
    }

    fn describe(id: &str, entry: &StoredEntry) -> StoredDocument {
        StoredDocument {
            id: id.to_string(),
            name: entry.title.clone(),
            url: GoogleDocsStore::document_url(id),
        }
    }

    #[cfg(test)]
    fn body_text(&self, id: &str) -> Option<String> {
        self.data.get(id).map(|entry| entry.body.clone())
    }

    #[cfg(test)]
    fn is_trashed(&self, id: &str) -> Option<bool> {
        self.data.get(id).map(|entry| entry.trashed)
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_document(&self, title: &str) -> Result<StoredDocument, StoreError> {
        let id = Self::mock_id();
        let entry = StoredEntry {
            title: title.to_string(),
            body: String::new(),
            trashed: false,
        };
        let doc = Self::describe(&id, &entry);
        self.data.insert(id, entry);

        tracing::debug!("Mock store created {}", doc.id);
        Ok(doc)
    }

    async fn open_document(&self, document_id: &str) -> Result<StoredDocument, StoreError> {
        self.data
            .get(document_id)
            .map(|entry| Self::describe(document_id, entry.value()))
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))
    }

    async fn set_body_text(&self, document_id: &str, text: &str) -> Result<(), StoreError> {
        let mut entry = self
            .data
            .get_mut(document_id)
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))?;
        entry.body = text.to_string();
        Ok(())
    }

    async fn trash_file(&self, document_id: &str) -> Result<(), StoreError> {
        let mut entry = self
            .data
            .get_mut(document_id)
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))?;
        entry.trashed = true;
        Ok(())
    }
}
