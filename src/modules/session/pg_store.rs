use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::modules::session::SessionStore;

/// Postgres-backed session store over the `wizard_sessions` table
pub struct PgSessionStore {
    pool: PgPool,
    ttl_secs: u64,
}

impl PgSessionStore {
    pub fn new(pool: PgPool, ttl_secs: u64) -> Self {
        Self { pool, ttl_secs }
    }

    fn next_expiry(&self) -> chrono::DateTime<Utc> {
        Utc::now() + Duration::seconds(self.ttl_secs as i64)
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn get(&self, owner: &str, key: &str) -> Result<Option<Value>> {
        let value: Option<Value> = sqlx::query_scalar(
            r#"
            SELECT value
            FROM wizard_sessions
            WHERE owner_sub = $1 AND key = $2 AND expires_at > now()
            "#,
        )
        .bind(owner)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read session value '{}': {:?}", key, e);
            AppError::Database(e)
        })?;

        Ok(value)
    }

    async fn put(&self, owner: &str, key: &str, value: Value) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO wizard_sessions (owner_sub, key, value, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_sub, key)
            DO UPDATE SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(owner)
        .bind(key)
        .bind(value)
        .bind(self.next_expiry())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to write session value '{}': {:?}", key, e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn remove(&self, owner: &str, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM wizard_sessions WHERE owner_sub = $1 AND key = $2")
            .bind(owner)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove session value '{}': {:?}", key, e);
                AppError::Database(e)
            })?;

        Ok(())
    }
}
