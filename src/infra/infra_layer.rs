// The infra module contains implementations of core traits.
// Each backend goes in its own submodule.

#[path = "google_docs/mod.rs"]
pub mod google_docs;

#[path = "documents/mod.rs"]
pub mod documents;
