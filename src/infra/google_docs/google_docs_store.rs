// =============================================================================
// GOOGLE DOCS / DRIVE DOCUMENT STORE
// =============================================================================
//
// Implements the core's `DocumentStore` port with two Google REST APIs:
//
// - Docs API v1: create a document, read its title, rewrite its body
// - Drive API v3: move the file to the trash
//
// **Body replacement:**
// The Docs API has no "set text" call. We read the body's end index, then
// send one batchUpdate that deletes everything between index 1 and the final
// newline (which can never be deleted) and inserts the new text at index 1.
//
// **Setup:**
// The Docs and Drive APIs must both be enabled on the Google Cloud project,
// and the credential needs the `documents` and `drive` scopes.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::google_auth::AccessTokenSource;
use crate::core::documents::{DocumentStore, StoreError, StoredDocument};

const DOCS_API_BASE: &str = "https://docs.googleapis.com";
const DRIVE_API_BASE: &str = "https://www.googleapis.com";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentResponse {
    document_id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BodyResponse {
    #[serde(default)]
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Body {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuralElement {
    end_index: Option<i64>,
}

impl BodyResponse {
    /// Index just past the body's last character (the trailing newline).
    /// An empty document reports 2; a missing body is treated the same way.
    fn end_index(&self) -> i64 {
        self.body
            .as_ref()
            .and_then(|b| b.content.iter().filter_map(|e| e.end_index).max())
            .unwrap_or(2)
    }
}

/// Builds the batchUpdate requests that replace the whole body with `text`.
fn replace_body_requests(end_index: i64, text: &str) -> Vec<Value> {
    let mut requests = Vec::new();

    // The final newline at end_index - 1 must stay.
    if end_index - 1 > 1 {
        requests.push(json!({
            "deleteContentRange": {
                "range": { "startIndex": 1, "endIndex": end_index - 1 }
            }
        }));
    }

    if !text.is_empty() {
        requests.push(json!({
            "insertText": {
                "location": { "index": 1 },
                "text": text
            }
        }));
    }

    requests
}

/// Maps a non-success HTTP status to the store's error type.
fn status_error(status: StatusCode, body: String, document_id: &str) -> StoreError {
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(document_id.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::PermissionDenied(body),
        _ => StoreError::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

pub struct GoogleDocsStore {
    client: Client,
    auth: Box<dyn AccessTokenSource>,
    docs_base_url: String,
    drive_base_url: String,
}

impl GoogleDocsStore {
    pub fn new(auth: Box<dyn AccessTokenSource>) -> Self {
        Self {
            client: Client::new(),
            auth,
            docs_base_url: DOCS_API_BASE.to_string(),
            drive_base_url: DRIVE_API_BASE.to_string(),
        }
    }

    /// Extracts the document ID from a Google Docs URL, or accepts a bare ID.
    ///
    /// Anything containing `/` or whitespace that is not a Docs URL is
    /// rejected, since the ID ends up in a request path.
    pub fn extract_doc_id(url_or_id: &str) -> Option<String> {
        if url_or_id.contains("docs.google.com") {
            if let Some(start) = url_or_id.find("/document/d/") {
                let after_d = &url_or_id[start + 12..];
                let end = after_d.find('/').unwrap_or(after_d.len());
                let id = &after_d[..end];
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        } else if !url_or_id.is_empty()
            && !url_or_id.contains('/')
            && !url_or_id.chars().any(char::is_whitespace)
            && !url_or_id.contains('?')
            && !url_or_id.contains('#')
        {
            return Some(url_or_id.to_string());
        }
        None
    }

    pub fn document_url(document_id: &str) -> String {
        format!("https://docs.google.com/document/d/{}/edit", document_id)
    }

    fn resolve_id(document_id: &str) -> Result<String, StoreError> {
        Self::extract_doc_id(document_id)
            .ok_or_else(|| StoreError::InvalidId(document_id.to_string()))
    }

    /// Attaches the bearer token, sends once, and turns non-2xx into errors.
    async fn send(&self, request: RequestBuilder, document_id: &str) -> Result<Response, StoreError> {
        let token = self
            .auth
            .access_token()
            .await
            .map_err(|e| StoreError::Credentials(e.to_string()))?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body, document_id));
        }

        Ok(response)
    }

    async fn body_end_index(&self, document_id: &str) -> Result<i64, StoreError> {
        let url = format!("{}/v1/documents/{}", self.docs_base_url, document_id);
        let request = self
            .client
            .get(&url)
            .query(&[("fields", "body.content(endIndex)")]);

        let body: BodyResponse = self
            .send(request, document_id)
            .await?
            .json()
            .await
            .map_err(transport_error)?;

        Ok(body.end_index())
    }
}

#[async_trait]
impl DocumentStore for GoogleDocsStore {
    async fn create_document(&self, title: &str) -> Result<StoredDocument, StoreError> {
        let url = format!("{}/v1/documents", self.docs_base_url);
        let request = self.client.post(&url).json(&json!({ "title": title }));

        let doc: DocumentResponse = self
            .send(request, "")
            .await?
            .json()
            .await
            .map_err(transport_error)?;

        tracing::info!("Created Google Doc {} ('{}')", doc.document_id, doc.title);

        Ok(StoredDocument {
            url: Self::document_url(&doc.document_id),
            id: doc.document_id,
            name: doc.title,
        })
    }

    async fn open_document(&self, document_id: &str) -> Result<StoredDocument, StoreError> {
        let id = Self::resolve_id(document_id)?;
        let url = format!("{}/v1/documents/{}", self.docs_base_url, id);
        let request = self.client.get(&url).query(&[("fields", "documentId,title")]);

        let doc: DocumentResponse = self
            .send(request, &id)
            .await?
            .json()
            .await
            .map_err(transport_error)?;

        Ok(StoredDocument {
            url: Self::document_url(&doc.document_id),
            id: doc.document_id,
            name: doc.title,
        })
    }

    async fn set_body_text(&self, document_id: &str, text: &str) -> Result<(), StoreError> {
        let id = Self::resolve_id(document_id)?;
        let end_index = self.body_end_index(&id).await?;

        let requests = replace_body_requests(end_index, text);
        if requests.is_empty() {
            return Ok(());
        }

        let url = format!("{}/v1/documents/{}:batchUpdate", self.docs_base_url, id);
        let request = self
            .client
            .post(&url)
            .json(&json!({ "requests": requests }));
        self.send(request, &id).await?;

        tracing::debug!("Replaced body of {} ({} chars)", id, text.len());
        Ok(())
    }

    async fn trash_file(&self, document_id: &str) -> Result<(), StoreError> {
        let id = Self::resolve_id(document_id)?;
        let url = format!("{}/drive/v3/files/{}", self.drive_base_url, id);
        let request = self
            .client
            .patch(&url)
            .query(&[("supportsAllDrives", "true")])
            .json(&json!({ "trashed": true }));
        self.send(request, &id).await?;

        tracing::info!("Moved Google Doc {} to trash", id);
        Ok(())
    }
}
