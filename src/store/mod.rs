// Persistent key-value store interface.
//
// The engine owns the serialization format; the store only ever sees opaque
// strings. Backends must tolerate concurrent use from one process, nothing
// more: there are no transactions, versions, or compare-and-set primitives,
// so whole-record overwrites are last-writer-wins.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A storage backend failure. The engine treats these as non-fatal: reads
/// degrade to "not found" and writes are best-effort.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// The four operations the engine relies on.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value at `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` at `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// All stored keys starting with `prefix`, in sorted order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Read and deserialize a JSON record. Store failures and malformed values
/// both degrade to `None` with a warning; they are never surfaced to callers.
pub async fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(value) => value?,
        Err(err) => {
            warn!("read of {key} failed, treating as absent: {err}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("malformed record at {key}, treating as absent: {err}");
            None
        }
    }
}

/// Serialize and write a JSON record. Best-effort: failures are logged and
/// reported via the return value, never propagated.
pub async fn write_json<T: Serialize>(store: &dyn KvStore, key: &str, value: &T) -> bool {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("failed to serialize record for {key}: {err}");
            return false;
        }
    };
    match store.set(key, &raw).await {
        Ok(()) => true,
        Err(err) => {
            warn!("write of {key} failed: {err}");
            false
        }
    }
}
