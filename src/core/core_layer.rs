// The core module holds the dispatch core. Nothing in here knows about HTTP
// or Google; those live in `web/` and `infra/`.

#[path = "documents/mod.rs"]
pub mod documents;

#[path = "identity/identity_service.rs"]
pub mod identity;
