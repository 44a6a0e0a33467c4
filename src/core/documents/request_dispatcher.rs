// Routes a parsed request to the matching document operation.
//
// Every operation runs inside its own fault boundary. A failure is logged
// with its real cause, and the client only sees "Failed to <verb> document".

use serde::Serialize;

use super::document_models::{Action, ActionRequest};
use super::document_service::{DocumentError, DocumentService};
use super::document_store::DocumentStore;
use super::response_formatter::{ResponseFormatter, TextOutput};

pub const INVALID_ACTION: &str = "Invalid action";

pub struct RequestDispatcher<S: DocumentStore> {
    documents: DocumentService<S>,
}

impl<S: DocumentStore> RequestDispatcher<S> {
    pub fn new(documents: DocumentService<S>) -> Self {
        Self { documents }
    }

    pub async fn dispatch(&self, request: &ActionRequest) -> TextOutput {
        let action = match request.action().and_then(Action::from_wire) {
            Some(action) => action,
            None => {
                tracing::warn!(action = ?request.raw_action(), "Rejected unroutable action");
                return ResponseFormatter::error(400, INVALID_ACTION);
            }
        };

        match action {
            Action::CreateDocument => {
                let result = self
                    .documents
                    .create(request.title(), request.content())
                    .await;
                Self::respond(action, result)
            }
            Action::UpdateDocument => {
                let result = self
                    .documents
                    .update(request.document_id(), request.content())
                    .await;
                Self::respond(action, result)
            }
            Action::DeleteDocument => {
                let result = self
                    .documents
                    .delete(request.document_id())
                    .await;
                Self::respond(action, result)
            }
        }
    }

    fn respond<T: Serialize>(action: Action, result: Result<T, DocumentError>) -> TextOutput {
        match result {
            Ok(data) => ResponseFormatter::success(&data),
            Err(e) => {
                tracing::error!("Error trying to {} document: {}", action.verb(), e);
                ResponseFormatter::error(500, &format!("Failed to {} document", action.verb()))
            }
        }
    }
}
