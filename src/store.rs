//! Storage seam for the resource collections.
//!
//! Handlers only ever need three operations per collection, so the store is
//! an object-safe trait and the rest of the crate holds an `Arc<dyn Store>`.
//! Records travel as JSON objects; the store assigns `_id` (a 24-hex-char
//! ObjectId string, the identifier the client keys on) and returns the
//! stored record.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),

    #[error("{0}")]
    Encode(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Assigns an identifier, persists the record, and returns it with
    /// `_id` filled in.
    async fn create(
        &self,
        collection: &str,
        record: Map<String, Value>,
    ) -> Result<Value, StoreError>;

    /// All records in the collection, store-native order. Empty collections
    /// yield an empty vec, never an error.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Removes the record if present. `Ok(false)` means nothing matched,
    /// including ids that do not parse as identifiers at all.
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}

/// Ephemeral store for local development (`STORE=memory`) and the contract
/// tests. Same id scheme as the MongoDB store, nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn create(
        &self,
        collection: &str,
        mut record: Map<String, Value>,
    ) -> Result<Value, StoreError> {
        record.insert("_id".to_string(), Value::String(ObjectId::new().to_hex()));
        let stored = Value::Object(record);

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = records.len();
        records.retain(|record| record.get("_id").and_then(Value::as_str) != Some(id));

        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(title: &str) -> Map<String, Value> {
        let Value::Object(map) = json!({"title": title, "description": "d"}) else {
            unreachable!()
        };
        map
    }

    #[tokio::test]
    async fn create_assigns_a_hex_object_id() {
        let store = MemoryStore::default();
        let stored = store.create("projects", record("a")).await.unwrap();

        let id = stored.get("_id").and_then(Value::as_str).unwrap();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(stored.get("title"), Some(&json!("a")));
    }

    #[tokio::test]
    async fn delete_is_idempotent_per_id() {
        let store = MemoryStore::default();
        let stored = store.create("projects", record("a")).await.unwrap();
        let id = stored.get("_id").and_then(Value::as_str).unwrap().to_string();

        assert!(store.delete_by_id("projects", &id).await.unwrap());
        assert!(!store.delete_by_id("projects", &id).await.unwrap());
        assert!(store.list("projects").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let store = MemoryStore::default();
        store.create("projects", record("a")).await.unwrap();

        assert!(store.list("surveyinformations").await.unwrap().is_empty());
        assert_eq!(store.list("projects").await.unwrap().len(), 1);
    }
}
