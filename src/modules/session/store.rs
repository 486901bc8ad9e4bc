use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::Result;

/// Key-value persistence scoped to one user, surviving across requests.
///
/// The wizard is the only writer; rows carry a TTL so abandoned drafts are
/// bounded by session expiry rather than lingering forever.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a value; expired entries read as absent.
    async fn get(&self, owner: &str, key: &str) -> Result<Option<Value>>;

    /// Insert or replace a value, refreshing its expiry.
    async fn put(&self, owner: &str, key: &str, value: Value) -> Result<()>;

    /// Remove a value if present.
    async fn remove(&self, owner: &str, key: &str) -> Result<()>;
}
