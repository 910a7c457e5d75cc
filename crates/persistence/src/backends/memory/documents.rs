//! In-memory ingredient documents.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::IngredientDocumentStore;
use crate::error::StorageResult;
use crate::types::IngredientDocument;

/// Ingredient documents keyed by exact name.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, IngredientDocument>>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document.
    pub fn insert(&self, document: IngredientDocument) {
        self.documents
            .write()
            .insert(document.name.clone(), document);
    }
}

#[async_trait]
impl IngredientDocumentStore for MemoryDocumentStore {
    fn store_name(&self) -> &'static str {
        "memory"
    }

    async fn find_ingredient(&self, name: &str) -> StorageResult<Option<IngredientDocument>> {
        Ok(self.documents.read().get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_exact() {
        let store = MemoryDocumentStore::new();
        store.insert(IngredientDocument::from_fields(
            "aspirin",
            vec![("Indications".to_string(), vec!["Pain".to_string()])],
        ));

        let found = store.find_ingredient("aspirin").await.unwrap().unwrap();
        assert_eq!(found.sections.len(), 1);
        assert!(store.find_ingredient("Aspirin").await.unwrap().is_none());
    }
}
