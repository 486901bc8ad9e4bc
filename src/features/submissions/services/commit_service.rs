use async_trait::async_trait;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report};
use crate::features::reports::services::ReportService;
use crate::features::submissions::dtos::{is_photo_mime_allowed, MAX_PHOTO_BYTES};
use crate::features::submissions::models::{PendingFile, ReportDraft};
use crate::features::tags::models::Tag;
use crate::features::tags::services::TagService;
use crate::modules::storage::PhotoStore;
use crate::shared::validation::FieldErrors;

/// Seam between the wizard flow and the commit machinery, so the step
/// handlers can be exercised without a database or a media directory.
#[async_trait]
pub trait CommitEngine: Send + Sync {
    async fn commit(
        &self,
        draft: &ReportDraft,
        pending: Option<&PendingFile>,
        owner: &str,
    ) -> Result<(Report, Vec<Tag>)>;
}

/// Commit Engine: turns an accumulated draft into a persisted report.
///
/// Full validation runs before any write. The photo file is written first,
/// then the report row and its tag associations go into one transaction; a
/// transaction failure removes the file again so nothing is half-persisted.
pub struct CommitService {
    report_service: Arc<ReportService>,
    tag_service: Arc<TagService>,
    photo_store: Arc<PhotoStore>,
}

impl CommitService {
    pub fn new(
        report_service: Arc<ReportService>,
        tag_service: Arc<TagService>,
        photo_store: Arc<PhotoStore>,
    ) -> Self {
        Self {
            report_service,
            tag_service,
            photo_store,
        }
    }
}

#[async_trait]
impl CommitEngine for CommitService {
    async fn commit(
        &self,
        draft: &ReportDraft,
        pending: Option<&PendingFile>,
        owner: &str,
    ) -> Result<(Report, Vec<Tag>)> {
        let photo_bytes = validate_for_commit(draft, pending)
            .map_err(AppError::ValidationErrors)?;
        // validate_for_commit only succeeds with a pending file present
        let pending = pending.ok_or_else(|| {
            AppError::Internal("Pending file vanished during commit".to_string())
        })?;

        // Coordinates are best-effort: anything non-numeric becomes 0.0
        let latitude = coerce_coordinate(draft.latitude.as_deref());
        let longitude = coerce_coordinate(draft.longitude.as_deref());

        let tags = self.tag_service.find_by_ids(&draft.tag_ids).await?;
        let tag_ids: Vec<i64> = tags.iter().map(|t| t.id).collect();

        let photo_key = self
            .photo_store
            .store(&photo_bytes, &pending.name, &pending.content_type)
            .await?;

        let data = CreateReport {
            user_id: owner.to_string(),
            comment: draft.comment.clone().unwrap_or_default(),
            photo_key: photo_key.clone(),
            photo_filename: pending.name.clone(),
            photo_content_type: pending.content_type.clone(),
            photo_size: pending.size,
            latitude,
            longitude,
            location_name: draft.location_name.clone(),
        };

        match self.report_service.create_with_tags(&data, &tag_ids).await {
            Ok(report) => Ok((report, tags)),
            Err(e) => {
                // The row never landed; don't leave the file behind
                if let Err(cleanup) = self.photo_store.remove(&photo_key).await {
                    tracing::warn!(
                        "Failed to clean up photo {} after aborted commit: {:?}",
                        photo_key,
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }
}

/// Coerce a raw coordinate string to a number; missing, non-numeric or
/// non-finite values default to 0.0 and never block a commit.
fn coerce_coordinate(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Model-level validation before any write. Returns the decoded photo bytes
/// on success, or the per-field messages on failure.
fn validate_for_commit(
    draft: &ReportDraft,
    pending: Option<&PendingFile>,
) -> std::result::Result<Vec<u8>, Vec<String>> {
    let mut errors = FieldErrors::new();

    if draft
        .comment
        .as_deref()
        .map(|c| c.trim().is_empty())
        .unwrap_or(true)
    {
        errors.add("comment", "is required");
    }

    let mut photo_bytes = None;
    match pending {
        None => errors.add("photo", "is required"),
        Some(file) => {
            if !is_photo_mime_allowed(&file.content_type) {
                errors.add("photo", format!("unsupported type '{}'", file.content_type));
            }
            match file.decode_bytes() {
                Ok(bytes) if bytes.len() > MAX_PHOTO_BYTES => {
                    errors.add(
                        "photo",
                        format!("exceeds the maximum size of {} bytes", MAX_PHOTO_BYTES),
                    );
                }
                Ok(bytes) => photo_bytes = Some(bytes),
                Err(e) => errors.add("photo", format!("stored content is unreadable: {}", e)),
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors.into_messages());
    }

    // photo errors were checked above; bytes must be present here
    Ok(photo_bytes.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_coordinate_defaults_to_zero() {
        assert_eq!(coerce_coordinate(None), 0.0);
        assert_eq!(coerce_coordinate(Some("")), 0.0);
        assert_eq!(coerce_coordinate(Some("not-a-number")), 0.0);
        assert_eq!(coerce_coordinate(Some("35.6895")), 35.6895);
        assert_eq!(coerce_coordinate(Some(" -139.70 ")), -139.70);
    }

    #[test]
    fn test_coerce_coordinate_rejects_non_finite_values() {
        // these parse as f64 but are not usable coordinates
        assert_eq!(coerce_coordinate(Some("NaN")), 0.0);
        assert_eq!(coerce_coordinate(Some("inf")), 0.0);
        assert_eq!(coerce_coordinate(Some("-inf")), 0.0);
        assert_eq!(coerce_coordinate(Some("infinity")), 0.0);
    }

    fn valid_draft() -> ReportDraft {
        ReportDraft {
            comment: Some("pothole near the school crossing".to_string()),
            tag_ids: vec![1],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_complete_draft() {
        let pending = PendingFile::from_bytes("p.jpg", "image/jpeg", b"\xff\xd8\xff");
        let bytes = validate_for_commit(&valid_draft(), Some(&pending)).unwrap();
        assert_eq!(bytes, b"\xff\xd8\xff");
    }

    #[test]
    fn test_validate_requires_photo_and_comment() {
        let draft = ReportDraft::default();
        let errors = validate_for_commit(&draft, None).unwrap_err();
        assert_eq!(
            errors,
            vec!["comment: is required".to_string(), "photo: is required".to_string()]
        );
    }

    #[test]
    fn test_validate_rejects_blank_comment() {
        let mut draft = valid_draft();
        draft.comment = Some("   ".to_string());
        let pending = PendingFile::from_bytes("p.jpg", "image/jpeg", b"x");
        let errors = validate_for_commit(&draft, Some(&pending)).unwrap_err();
        assert_eq!(errors, vec!["comment: is required".to_string()]);
    }

    #[test]
    fn test_validate_rejects_oversized_photo() {
        let big = vec![0u8; MAX_PHOTO_BYTES + 1];
        let pending = PendingFile::from_bytes("big.jpg", "image/jpeg", &big);
        let errors = validate_for_commit(&valid_draft(), Some(&pending)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("photo: exceeds"));
    }

    #[test]
    fn test_validate_rejects_corrupt_stored_content() {
        let pending = PendingFile {
            content: "!!! not base64".to_string(),
            name: "p.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size: 3,
        };
        let errors = validate_for_commit(&valid_draft(), Some(&pending)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("photo: stored content is unreadable"));
    }

    #[test]
    fn test_validate_rejects_non_image_type() {
        let pending = PendingFile::from_bytes("doc.pdf", "application/pdf", b"%PDF");
        let errors = validate_for_commit(&valid_draft(), Some(&pending)).unwrap_err();
        assert_eq!(
            errors,
            vec!["photo: unsupported type 'application/pdf'".to_string()]
        );
    }
}
