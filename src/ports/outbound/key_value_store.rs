use crate::shared::Result;
use serde_json::Value;

/// KeyValueStore port backing the TTL cache
///
/// A flat, persisted key space of JSON values. Implementations must be
/// `Send + Sync`; concurrent writers to the same key are last-write-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes a key; removing a missing key is not an error
    fn delete(&self, key: &str) -> Result<()>;

    /// Every stored key starting with `prefix`
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}
