//! MongoDB-backed store.
//!
//! One collection per resource, documents inserted exactly as validated.
//! The client connects lazily, so the process starts without a reachable
//! server and store failures surface per-request as 500s instead of
//! crashing startup.
//!
//! Existing data predates this implementation: ids are ObjectIds and the
//! browser client keys on `_id` as a plain hex string, so documents are
//! rendered to JSON with `_id` flattened to hex rather than the
//! `{"$oid": ...}` extended-JSON form.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Database,
    bson::{Bson, Document, doc, oid::ObjectId, to_document},
    options::ClientOptions,
};
use serde_json::{Map, Value};
use tracing::info;

use crate::store::{Store, StoreError};

pub struct MongoStore {
    db: Database,
}

pub async fn init_mongo(mongo_url: &str, mongo_db: &str) -> Result<MongoStore, StoreError> {
    let mut options = ClientOptions::parse(mongo_url).await?;
    options.server_selection_timeout = Some(Duration::from_secs(5));

    let client = Client::with_options(options)?;
    info!("Using MongoDB database {mongo_db}");

    Ok(MongoStore {
        db: client.database(mongo_db),
    })
}

#[async_trait]
impl Store for MongoStore {
    async fn create(
        &self,
        collection: &str,
        record: Map<String, Value>,
    ) -> Result<Value, StoreError> {
        let mut document =
            to_document(&record).map_err(|e| StoreError::Encode(e.to_string()))?;
        document.insert("_id", ObjectId::new());

        self.db
            .collection::<Document>(collection)
            .insert_one(&document)
            .await?;

        Ok(document_to_json(document))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let mut cursor = self
            .db
            .collection::<Document>(collection)
            .find(doc! {})
            .await?;

        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            records.push(document_to_json(document));
        }

        Ok(records)
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        // An id that does not parse cannot match any document.
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(false);
        };

        let result = self
            .db
            .collection::<Document>(collection)
            .delete_one(doc! { "_id": object_id })
            .await?;

        Ok(result.deleted_count > 0)
    }
}

fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(timestamp) => {
            Value::String(timestamp.try_to_rfc3339_string().unwrap_or_default())
        }
        Bson::Document(document) => document_to_json(document),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::DateTime;

    use super::*;

    #[test]
    fn object_ids_flatten_to_hex_strings() {
        let id = ObjectId::new();
        let json = document_to_json(doc! { "_id": id, "title": "Water Project" });

        assert_eq!(json.get("_id"), Some(&Value::String(id.to_hex())));
        assert_eq!(json.get("title"), Some(&Value::String("Water Project".into())));
    }

    #[test]
    fn datetimes_flatten_to_rfc3339_strings() {
        let json = document_to_json(doc! { "createdAt": DateTime::from_millis(0) });

        let rendered = json.get("createdAt").and_then(Value::as_str).unwrap();
        assert!(rendered.starts_with("1970-01-01T00:00:00"));
    }
}
