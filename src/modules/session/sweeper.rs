use sqlx::PgPool;
use std::time::Duration;
use tokio::time::interval;

use crate::core::error::{AppError, Result};

/// Background worker that deletes expired session rows.
///
/// Expired entries are already invisible to readers; the sweeper just keeps
/// the table from accumulating abandoned drafts.
pub struct SessionSweeper {
    pool: PgPool,
    interval_secs: u64,
}

impl SessionSweeper {
    pub fn new(pool: PgPool, interval_secs: u64) -> Self {
        Self {
            pool,
            interval_secs,
        }
    }

    /// Run the sweeper in a background loop
    pub async fn run(&self) {
        tracing::info!("Starting session sweeper worker");

        let mut interval = interval(Duration::from_secs(self.interval_secs));

        loop {
            interval.tick().await;

            if let Err(e) = self.sweep().await {
                tracing::error!("Error sweeping expired sessions: {:?}", e);
            }
        }
    }

    async fn sweep(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM wizard_sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() > 0 {
            tracing::info!("Swept {} expired session rows", result.rows_affected());
        }

        Ok(())
    }
}
