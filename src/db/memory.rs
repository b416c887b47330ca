//! In-process [`RecordStore`] used by tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use super::record_store::{RecordStore, StoreError};

/// Keeps documents as serialized text, the same as the SQLite store, so
/// malformed contents can be planted with [`MemoryRecordStore::insert_raw`].
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every `get` and `set` fails with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn insert_raw(&self, key: &str, text: &str) {
        self.records
            .write()
            .await
            .insert(key.to_string(), text.to_string());
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.records.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.check_available()?;

        let records = self.records.read().await;
        let Some(text) = records.get(key) else {
            return Ok(None);
        };

        match serde_json::from_str(text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Stored text is not valid JSON");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, document: &Value) -> Result<(), StoreError> {
        self.check_available()?;

        let text = serde_json::to_string(document)?;
        self.records.write().await.insert(key.to_string(), text);
        Ok(())
    }
}
