//! In-memory backend.
//!
//! Holds the catalog, the accounts and the ingredient documents in process.
//! Search semantics follow the PostgreSQL backend: left joins, trigram
//! similarity for the free-text term, and the same ordering. Used by tests
//! and by the server's `memory` storage mode.

mod accounts;
mod catalog;
mod documents;

pub use catalog::{MemoryBackend, ProductRecord};
pub use documents::MemoryDocumentStore;
