use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Returned by a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub document_id: String,
    pub title: String,
    pub url: String,
}

/// Returned by a successful update.
///
/// `last_modified` is this service's clock at response time, not the
/// store's revision time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub document_id: String,
    pub title: String,
    pub last_modified: String,
}

/// Returned by a successful trash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub message: String,
    pub document_id: String,
}

/// Inbound POST body, kept as the raw JSON value.
///
/// Any valid JSON parses. Fields are read on demand: a field that is absent
/// or not a string reads as `None`, and each operation checks for the fields
/// it needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ActionRequest {
    body: Value,
}

impl ActionRequest {
    pub fn from_value(body: Value) -> Self {
        Self { body }
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }

    pub fn action(&self) -> Option<&str> {
        self.text("action")
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn content(&self) -> Option<&str> {
        self.text("content")
    }

    pub fn document_id(&self) -> Option<&str> {
        self.text("documentId")
    }

    /// The `action` field as sent, for logging rejected requests.
    pub fn raw_action(&self) -> Option<&Value> {
        self.body.get("action")
    }
}

/// The three routable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateDocument,
    UpdateDocument,
    DeleteDocument,
}

impl Action {
    /// Exact, case-sensitive match on the wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "createDocument" => Some(Action::CreateDocument),
            "updateDocument" => Some(Action::UpdateDocument),
            "deleteDocument" => Some(Action::DeleteDocument),
            _ => None,
        }
    }

    /// Verb used in the client-facing failure message.
    pub fn verb(&self) -> &'static str {
        match self {
            Action::CreateDocument => "create",
            Action::UpdateDocument => "update",
            Action::DeleteDocument => "delete",
        }
    }
}

/// A document as the external store describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: String,
    pub name: String,
    pub url: String,
}
