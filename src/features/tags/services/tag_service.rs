use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::tags::models::Tag;

/// Service for the category tag vocabulary
pub struct TagService {
    pool: PgPool,
}

impl TagService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the full vocabulary, alphabetically
    pub async fn list(&self) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list tags: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(tags)
    }

    /// Resolve a set of tag ids; unknown ids simply drop out of the result
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let tags =
            sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = ANY($1) ORDER BY name")
                .bind(ids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to resolve tags {:?}: {:?}", ids, e);
                    AppError::Database(e)
                })?;

        Ok(tags)
    }
}
