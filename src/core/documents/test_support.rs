// Recording fake for the store port, shared by the core tests.

use async_trait::async_trait;
use std::sync::Mutex;

use super::document_models::StoredDocument;
use super::document_store::{DocumentStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create(String),
    Open(String),
    SetBodyText(String, String),
    Trash(String),
}

pub struct RecordingStore {
    calls: Mutex<Vec<StoreCall>>,
    fail: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Every call is recorded, then fails with a transport error.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) -> Result<usize, StoreError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        if self.fail {
            Err(StoreError::Transport("store unavailable".to_string()))
        } else {
            Ok(calls.len())
        }
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn create_document(&self, title: &str) -> Result<StoredDocument, StoreError> {
        let n = self.record(StoreCall::Create(title.to_string()))?;
        let id = format!("doc-{}", n);
        Ok(StoredDocument {
            url: format!("https://docs.example/{}", id),
            id,
            name: title.to_string(),
        })
    }

    async fn open_document(&self, document_id: &str) -> Result<StoredDocument, StoreError> {
        self.record(StoreCall::Open(document_id.to_string()))?;
        Ok(StoredDocument {
            id: document_id.to_string(),
            name: format!("Title of {}", document_id),
            url: format!("https://docs.example/{}", document_id),
        })
    }

    async fn set_body_text(&self, document_id: &str, text: &str) -> Result<(), StoreError> {
        self.record(StoreCall::SetBodyText(
            document_id.to_string(),
            text.to_string(),
        ))?;
        Ok(())
    }

    async fn trash_file(&self, document_id: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Trash(document_id.to_string()))?;
        Ok(())
    }
}
