//! Key to JSON-document persistence.
//!
//! Every component of the core talks to storage through [`RecordStore`], which is
//! injected as `Arc<dyn RecordStore>`. Keys are opaque strings; documents are plain
//! JSON with no schema enforced by the store. Callers decode them through
//! [`load_document`], which treats a document of the wrong shape as absent.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Storage-level failures. Always recoverable: the operation that hit one aborts
/// and nothing is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the document stored under `key`, or `None` if the key is unset or
    /// its contents are not valid JSON.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrites the document stored under `key`.
    async fn set(&self, key: &str, document: &Value) -> Result<(), StoreError>;
}

/// Fetches `key` and decodes it as `T`.
///
/// A document that exists but does not decode is logged and reported as `None`,
/// so callers only ever see "a record" or "no record".
pub async fn load_document<T>(store: &dyn RecordStore, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
{
    let Some(value) = store.get(key).await? else {
        return Ok(None);
    };

    match serde_json::from_value(value) {
        Ok(document) => Ok(Some(document)),
        Err(e) => {
            warn!(key, error = %e, "Ignoring malformed document");
            Ok(None)
        }
    }
}

pub async fn save_document<T>(
    store: &dyn RecordStore,
    key: &str,
    document: &T,
) -> Result<(), StoreError>
where
    T: Serialize + Sync,
{
    let value = serde_json::to_value(document)?;
    store.set(key, &value).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRecordStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    #[tokio::test]
    async fn load_document_missing_key_is_none() {
        let store = MemoryRecordStore::new();
        let doc: Option<Counter> = load_document(&store, "nothing").await.unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn save_then_load_document() {
        let store = MemoryRecordStore::new();
        save_document(&store, "c", &Counter { count: 4 }).await.unwrap();

        let doc: Option<Counter> = load_document(&store, "c").await.unwrap();
        assert_eq!(doc, Some(Counter { count: 4 }));
    }

    #[tokio::test]
    async fn wrong_shape_is_treated_as_absent() {
        let store = MemoryRecordStore::new();
        store
            .set("c", &serde_json::json!({ "count": "many" }))
            .await
            .unwrap();

        let doc: Option<Counter> = load_document(&store, "c").await.unwrap();
        assert!(doc.is_none());
    }

    #[test]
    fn store_error_display() {
        let err: StoreError = sea_orm::DbErr::Custom("disk full".to_string()).into();
        assert!(matches!(err, StoreError::Database(_)));
        assert!(err.to_string().starts_with("Database error:"));
        assert!(err.to_string().contains("disk full"));
    }
}
