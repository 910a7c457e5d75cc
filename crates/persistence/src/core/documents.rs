//! Ingredient document store trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::IngredientDocument;

/// Reads free-form ingredient metadata keyed by ingredient name.
#[async_trait]
pub trait IngredientDocumentStore: Send + Sync {
    /// Returns a human-readable name for this store.
    fn store_name(&self) -> &'static str;

    /// Finds the document whose name field equals `name`.
    async fn find_ingredient(&self, name: &str) -> StorageResult<Option<IngredientDocument>>;
}

/// Shared, type-erased document store.
pub type DynDocumentStore = Arc<dyn IngredientDocumentStore>;
