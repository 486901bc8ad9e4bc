use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::{Report, ReportPriority, ReportStatus};
use crate::features::tags::dtos::TagResponseDto;

/// Metadata of the stored photo (the blob itself is served from the media root)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoMetaDto {
    pub key: String,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
}

/// Response DTO for a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i64,
    pub comment: String,
    pub photo: PhotoMetaDto,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: Option<String>,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub admin_note: Option<String>,
    pub posted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub tags: Vec<TagResponseDto>,
}

impl ReportResponseDto {
    pub fn from_report(report: Report, tags: Vec<TagResponseDto>) -> Self {
        Self {
            id: report.id,
            comment: report.comment,
            photo: PhotoMetaDto {
                key: report.photo_key,
                filename: report.photo_filename,
                content_type: report.photo_content_type,
                size: report.photo_size,
            },
            latitude: report.latitude,
            longitude: report.longitude,
            location_name: report.location_name,
            status: report.status,
            priority: report.priority,
            admin_note: report.admin_note,
            posted_at: report.posted_at,
            completed_at: report.completed_at,
            tags,
        }
    }
}

/// Request DTO for the staff status edit
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
    pub priority: Option<ReportPriority>,
    pub admin_note: Option<String>,
}
