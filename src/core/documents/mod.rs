pub mod document_models;
pub mod document_service;
pub mod document_store;
pub mod entry_point;
pub mod request_dispatcher;
pub mod response_formatter;

#[cfg(test)]
pub mod test_support;

pub use document_models::StoredDocument;
pub use document_service::DocumentService;
pub use document_store::{DocumentStore, StoreError};
pub use entry_point::{ApiSettings, DocumentApi};
pub use request_dispatcher::RequestDispatcher;
pub use response_formatter::{TextOutput, INTERNAL_SERVER_ERROR};
