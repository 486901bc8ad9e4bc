use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    New,
    InProgress,
    Completed,
    NotRequired,
}

impl ReportStatus {
    /// Timestamp to store in `completed_at` after a status edit. Non-null
    /// exactly when the status is `Completed`; a report that is already
    /// completed keeps its original timestamp on a repeat edit.
    pub fn completion_timestamp(
        &self,
        current: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self {
            ReportStatus::Completed => current.or(Some(now)),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::New => write!(f, "new"),
            ReportStatus::InProgress => write!(f, "in_progress"),
            ReportStatus::Completed => write!(f, "completed"),
            ReportStatus::NotRequired => write!(f, "not_required"),
        }
    }
}

/// Report priority enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ReportPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportPriority::Low => write!(f, "low"),
            ReportPriority::Medium => write!(f, "medium"),
            ReportPriority::High => write!(f, "high"),
        }
    }
}

/// Database model for a submitted photo report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: i64,
    pub user_id: String,
    /// Never set by the submission wizard; reserved for staff tooling
    pub title: Option<String>,
    pub comment: String,
    pub photo_key: String,
    pub photo_filename: String,
    pub photo_content_type: String,
    pub photo_size: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: Option<String>,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub admin_note: Option<String>,
    pub posted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Data for creating a new report (commit engine output)
#[derive(Debug)]
pub struct CreateReport {
    pub user_id: String,
    pub comment: String,
    pub photo_key: String,
    pub photo_filename: String,
    pub photo_content_type: String,
    pub photo_size: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_timestamp_set_only_for_completed() {
        let now = Utc::now();
        assert_eq!(
            ReportStatus::Completed.completion_timestamp(None, now),
            Some(now)
        );
        assert_eq!(ReportStatus::New.completion_timestamp(None, now), None);
        assert_eq!(ReportStatus::InProgress.completion_timestamp(None, now), None);
        assert_eq!(ReportStatus::NotRequired.completion_timestamp(None, now), None);
    }

    #[test]
    fn test_repeat_completed_keeps_original_timestamp() {
        let first = Utc::now() - chrono::Duration::hours(2);
        let now = Utc::now();

        // no transition happened; the original completion time stands
        assert_eq!(
            ReportStatus::Completed.completion_timestamp(Some(first), now),
            Some(first)
        );
        // leaving completed always clears it
        assert_eq!(
            ReportStatus::InProgress.completion_timestamp(Some(first), now),
            None
        );
    }

    #[test]
    fn test_status_serde_names_match_database_enum() {
        assert_eq!(
            serde_json::to_string(&ReportStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::from_str::<ReportStatus>("\"not_required\"").unwrap(),
            ReportStatus::NotRequired
        );
        assert_eq!(
            serde_json::to_string(&ReportPriority::Medium).unwrap(),
            "\"medium\""
        );
    }
}
