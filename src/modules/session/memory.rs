use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::modules::session::SessionStore;

/// In-memory session store used by tests that exercise draft semantics
/// without a database. No expiry: tests control the lifecycle explicitly.
#[derive(Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<(String, String), Value>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, owner: &str, key: &str) -> Result<Option<Value>> {
        let values = self.values.read().await;
        Ok(values.get(&(owner.to_string(), key.to_string())).cloned())
    }

    async fn put(&self, owner: &str, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.write().await;
        values.insert((owner.to_string(), key.to_string()), value);
        Ok(())
    }

    async fn remove(&self, owner: &str, key: &str) -> Result<()> {
        let mut values = self.values.write().await;
        values.remove(&(owner.to_string(), key.to_string()));
        Ok(())
    }
}
