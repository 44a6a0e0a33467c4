// DocumentStore implementations that don't talk to Google.

pub mod in_memory;

pub use in_memory::InMemoryDocumentStore;
