//! `ProfileStore` trait — the document-store seam the wizard writes through.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// Result of reading one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub exists: bool,
    pub data: Option<Value>,
}

impl DocumentSnapshot {
    pub fn missing() -> Self {
        Self {
            exists: false,
            data: None,
        }
    }

    pub fn found(data: Value) -> Self {
        Self {
            exists: true,
            data: Some(data),
        }
    }

    /// Look up a top-level field of the document.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|d| d.get(field))
    }
}

/// Backend-agnostic document store keyed by `(collection, key)`.
///
/// Writes are merge-writes: fields present in the payload replace the stored
/// ones, nested objects merge recursively, explicit `null` is stored as
/// `null`, and fields absent from the payload are left untouched.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Merge `payload` into the document at `collection/key`, creating it if needed.
    async fn merge_write(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), StoreError>;

    /// Read the document at `collection/key`.
    async fn read(&self, collection: &str, key: &str) -> Result<DocumentSnapshot, StoreError>;
}

/// Apply a merge-write `patch` onto `target` in place.
pub fn merge_document(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (field, value) in incoming {
                match existing.get_mut(field) {
                    Some(slot) if slot.is_object() && value.is_object() => {
                        merge_document(slot, value);
                    }
                    _ => {
                        existing.insert(field.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}
