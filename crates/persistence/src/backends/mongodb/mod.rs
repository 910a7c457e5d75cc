//! MongoDB ingredient document store.
//!
//! Reads the `ingredients` collection, where each document carries the
//! ingredient name in `Nom` and free-form metadata in the other fields.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::core::IngredientDocumentStore;
use crate::error::StorageResult;
use crate::types::{IngredientDocument, NAME_FIELD};

/// Configuration for the MongoDB document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Connection URI.
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Database name.
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding the ingredient documents.
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_uri() -> String {
    "mongodb://localhost:27017/".to_string()
}

fn default_database() -> String {
    "medicaments_db".to_string()
}

fn default_collection() -> String {
    "ingredients".to_string()
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

/// Ingredient documents backed by MongoDB.
#[derive(Debug, Clone)]
pub struct MongoDocumentStore {
    collection: Collection<Document>,
}

impl MongoDocumentStore {
    /// Connects to MongoDB.
    ///
    /// The driver connects lazily; an unreachable server surfaces on the
    /// first lookup.
    pub async fn connect(config: &MongoConfig) -> StorageResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB document store ready"
        );

        Ok(Self { collection })
    }
}

#[async_trait]
impl IngredientDocumentStore for MongoDocumentStore {
    fn store_name(&self) -> &'static str {
        "mongodb"
    }

    async fn find_ingredient(&self, name: &str) -> StorageResult<Option<IngredientDocument>> {
        let found = self.collection.find_one(doc! { NAME_FIELD: name }).await?;
        Ok(found.map(|document| to_ingredient(name, document)))
    }
}

fn to_ingredient(name: &str, document: Document) -> IngredientDocument {
    let fields = document
        .into_iter()
        .map(|(key, value)| (key, entries(value)));
    IngredientDocument::from_fields(name, fields)
}

/// Flattens a field value into display entries.
fn entries(value: Bson) -> Vec<String> {
    match value {
        Bson::Null => Vec::new(),
        Bson::String(s) => vec![s],
        Bson::Array(items) => items.into_iter().flat_map(entries).collect(),
        Bson::Document(inner) => inner
            .into_iter()
            .flat_map(|(key, value)| {
                entries(value)
                    .into_iter()
                    .map(move |entry| format!("{}: {}", key, entry))
            })
            .collect(),
        other => vec![other.to_string()],
    }
}
