use chrono::Utc;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::UpdateReportStatusDto;
use crate::features::reports::models::{CreateReport, Report};
use crate::features::tags::models::Tag;
use crate::shared::types::PaginationQuery;

const REPORT_COLUMNS: &str = "id, user_id, title, comment, photo_key, photo_filename, \
     photo_content_type, photo_size, latitude, longitude, location_name, \
     status, priority, admin_note, posted_at, completed_at";

/// Service for persisted report operations
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a report row and its tag associations in one transaction.
    ///
    /// Either the report exists with all its tags attached, or nothing was
    /// written; a failure part-way through never leaves a tagless report.
    pub async fn create_with_tags(&self, data: &CreateReport, tag_ids: &[i64]) -> Result<Report> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin report transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports
                (user_id, comment, photo_key, photo_filename, photo_content_type,
                 photo_size, latitude, longitude, location_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(&data.user_id)
        .bind(&data.comment)
        .bind(&data.photo_key)
        .bind(&data.photo_filename)
        .bind(&data.photo_content_type)
        .bind(data.photo_size)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(&data.location_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            AppError::Database(e)
        })?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO report_tags (report_id, tag_id) VALUES ($1, $2)")
                .bind(report.id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to attach tag {} to report {}: {:?}",
                        tag_id,
                        report.id,
                        e
                    );
                    AppError::Database(e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit report transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Created report {} for user {} with {} tags",
            report.id,
            data.user_id,
            tag_ids.len()
        );

        Ok(report)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        report.ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Reports belonging to one user, newest first
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE user_id = $1 ORDER BY posted_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports for {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok(reports)
    }

    /// Paginated listing across all users (staff view), newest first
    pub async fn list_all(&self, pagination: &PaginationQuery) -> Result<(Vec<Report>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reports: {:?}", e);
                AppError::Database(e)
            })?;

        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports ORDER BY posted_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((reports, total))
    }

    /// Tags attached to one report, alphabetically
    pub async fn tags_for(&self, report_id: i64) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN report_tags rt ON rt.tag_id = t.id
            WHERE rt.report_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tags for report {}: {:?}", report_id, e);
            AppError::Database(e)
        })?;

        Ok(tags)
    }

    /// Staff status edit. `completed_at` follows the transition: set when the
    /// status first becomes `completed`, kept on a repeat `completed` edit,
    /// cleared for every other status.
    pub async fn update_status(
        &self,
        id: i64,
        dto: &UpdateReportStatusDto,
        updated_by: &str,
    ) -> Result<Report> {
        let current = self.get_by_id(id).await?;
        let completed_at = dto.status.completion_timestamp(current.completed_at, Utc::now());

        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports
            SET status = $2,
                priority = COALESCE($3, priority),
                admin_note = COALESCE($4, admin_note),
                completed_at = $5
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.status)
        .bind(dto.priority)
        .bind(&dto.admin_note)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update status of report {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        let report = report.ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!(
            "Report {} status set to {} by {}",
            id,
            report.status,
            updated_by
        );

        Ok(report)
    }
}
