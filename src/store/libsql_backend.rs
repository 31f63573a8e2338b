//! libSQL backend — `ProfileStore` persisted as JSON documents.
//!
//! Supports local file and in-memory databases. Each document is one row in
//! the `documents` table keyed by `(collection, doc_key)`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::migrations;
use crate::store::traits::{DocumentSnapshot, ProfileStore, merge_document};

/// libSQL document store.
///
/// Stores a single connection that is reused for all operations. Merge-writes
/// are read-modify-write, so they are serialized behind `write_lock`.
pub struct LibSqlProfileStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
    write_lock: Mutex<()>,
}

impl LibSqlProfileStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db).await?;
        info!(path = %path.display(), "Profile store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                StoreError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;
        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to create connection: {e}")))?;
        migrations::run_migrations(&conn).await?;
        Ok(Self {
            db: Arc::new(db),
            conn,
            write_lock: Mutex::new(()),
        })
    }

    async fn load(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT data FROM documents WHERE collection = ?1 AND doc_key = ?2",
                params![collection, key],
            )
            .await
            .map_err(|e| StoreError::Query(format!("read {collection}/{key}: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let raw: String = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("read {collection}/{key}: {e}")))?;
                let value = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("read {collection}/{key}: {e}"))),
        }
    }
}

#[async_trait]
impl ProfileStore for LibSqlProfileStore {
    async fn merge_write(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), StoreError> {
        if !payload.is_object() {
            return Err(StoreError::NotAnObject {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }

        let _guard = self.write_lock.lock().await;

        let mut doc = self
            .load(collection, key)
            .await?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        merge_document(&mut doc, payload);

        let data =
            serde_json::to_string(&doc).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO documents (collection, doc_key, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT (collection, doc_key) DO UPDATE SET data = ?3, updated_at = ?4",
                params![collection, key, data, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("merge_write {collection}/{key}: {e}")))?;

        debug!(collection, key, "Document merged");
        Ok(())
    }

    async fn read(&self, collection: &str, key: &str) -> Result<DocumentSnapshot, StoreError> {
        Ok(match self.load(collection, key).await? {
            Some(data) => DocumentSnapshot::found(data),
            None => DocumentSnapshot::missing(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn test_store() -> LibSqlProfileStore {
        LibSqlProfileStore::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn read_missing_document() {
        let store = test_store().await;
        let snap = store.read("userProfiles", "ghost").await.unwrap();
        assert_eq!(snap, DocumentSnapshot::missing());
    }

    #[tokio::test]
    async fn merge_write_upserts_and_merges() {
        let store = test_store().await;
        store
            .merge_write(
                "userProfiles",
                "u1",
                &json!({"displayName": "Ana", "artistRoleOther": "mentor"}),
            )
            .await
            .unwrap();
        store
            .merge_write(
                "userProfiles",
                "u1",
                &json!({"artistRoleOther": null, "onboardingCompleted": true}),
            )
            .await
            .unwrap();

        let snap = store.read("userProfiles", "u1").await.unwrap();
        assert!(snap.exists);
        assert_eq!(snap.get("displayName"), Some(&json!("Ana")));
        assert_eq!(snap.get("artistRoleOther"), Some(&Value::Null));
        assert_eq!(snap.get("onboardingCompleted"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = test_store().await;
        store
            .merge_write("userProfiles", "u1", &json!({"a": 1}))
            .await
            .unwrap();
        assert!(!store.read("galleries", "u1").await.unwrap().exists);
    }

    #[tokio::test]
    async fn rejects_non_object_payload() {
        let store = test_store().await;
        let err = store
            .merge_write("userProfiles", "u1", &json!("scalar"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject { .. }));
    }

    #[tokio::test]
    async fn documents_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("profiles.db");

        {
            let store = LibSqlProfileStore::new_local(&path).await.unwrap();
            store
                .merge_write("userProfiles", "u1", &json!({"onboardingCompleted": true}))
                .await
                .unwrap();
        }

        let reopened = LibSqlProfileStore::new_local(&path).await.unwrap();
        let snap = reopened.read("userProfiles", "u1").await.unwrap();
        assert_eq!(snap.get("onboardingCompleted"), Some(&json!(true)));
    }
}
