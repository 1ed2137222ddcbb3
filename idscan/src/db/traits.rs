use async_trait::async_trait;

use crate::error::Result;

/// String key-value storage scoped to the calling environment.
///
/// Values are stored verbatim; callers own parsing and defaults.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
