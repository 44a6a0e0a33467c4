// =============================================================================
// GOOGLE DOCS MODULE
// =============================================================================
//
// Everything that talks to Google lives here:
//
// - `google_auth.rs`: bearer credentials (service account JWT or a static token)
// - `google_docs_store.rs`: the `DocumentStore` implementation over Docs + Drive
// - `google_identity.rs`: caller email lookup for the status probe and auth gate
//
// The core never sees reqwest or Google response shapes; it only gets
// `StoredDocument`s and `StoreError`s back.

pub mod google_auth;
pub mod google_docs_store;
pub mod google_identity;

pub use google_auth::{AccessTokenSource, ServiceAccountAuth, StaticAccessToken};
pub use google_docs_store::GoogleDocsStore;
pub use google_identity::GoogleTokenInfoIdentity;
