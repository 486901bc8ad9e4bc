use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::reports::dtos::ReportResponseDto;
use crate::features::submissions::models::PendingFile;

/// Maximum accepted photo size (8 MB)
pub const MAX_PHOTO_BYTES: usize = 8 * 1024 * 1024;

/// MIME types accepted for the report photo
pub const ALLOWED_PHOTO_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
];

pub fn is_photo_mime_allowed(content_type: &str) -> bool {
    ALLOWED_PHOTO_MIME_TYPES.contains(&content_type)
}

/// The wizard's steps, as flow targets in responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Step1,
    Step2,
    Step3,
    Done,
}

/// Metadata of the photo currently held in the draft
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PendingPhotoDto {
    pub name: String,
    pub content_type: String,
    pub size: i64,
}

impl From<&PendingFile> for PendingPhotoDto {
    fn from(f: &PendingFile) -> Self {
        Self {
            name: f.name.clone(),
            content_type: f.content_type.clone(),
            size: f.size,
        }
    }
}

/// Step 2 form: richer location detail text
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Step2LocationDto {
    #[validate(length(min = 10, message = "must be at least 10 characters"))]
    pub location_name: String,
}

/// Optional raw coordinates from client-side geolocation capture.
/// Kept as strings; coercion to numbers is the commit engine's job.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CoordinatesDto {
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

/// Flow response for every wizard endpoint.
///
/// The original flow was server-rendered redirects; here each response tells
/// the client which form to show or where to go next. Missing-draft
/// preconditions and the commit discard rule both surface as `redirect`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WizardStepResponse {
    /// Step 1 form, prefilled from any existing draft
    Step1Form {
        comment: Option<String>,
        tag_id: Option<i64>,
        photo: Option<PendingPhotoDto>,
    },
    /// Step 2 form, prefilled
    Step2Form { location_name: Option<String> },
    /// Step 3 read-only summary of the accumulated draft
    Summary {
        comment: Option<String>,
        tag_names: Vec<String>,
        location_name: Option<String>,
        latitude: Option<String>,
        longitude: Option<String>,
        photo: Option<PendingPhotoDto>,
    },
    /// Step completed, move forward
    Advance { next: WizardStep },
    /// Recoverable flow error: go back and start over
    Redirect {
        to: WizardStep,
        notice: String,
        errors: Vec<String>,
    },
    /// Commit succeeded
    Completed { report: ReportResponseDto },
}

impl WizardStepResponse {
    /// Standard redirect for a missing draft at step 2/3
    pub fn missing_draft() -> Self {
        WizardStepResponse::Redirect {
            to: WizardStep::Step1,
            notice: "No submission in progress. Please start from step 1.".to_string(),
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::flatten_validation_errors;

    #[test]
    fn test_photo_mime_allow_list() {
        assert!(is_photo_mime_allowed("image/jpeg"));
        assert!(is_photo_mime_allowed("image/webp"));
        assert!(!is_photo_mime_allowed("application/pdf"));
        assert!(!is_photo_mime_allowed("image/svg+xml"));
    }

    #[test]
    fn test_step2_minimum_length() {
        let too_short = Step2LocationDto {
            location_name: "corner".to_string(),
        };
        let errors = too_short.validate().unwrap_err();
        assert_eq!(
            flatten_validation_errors(&errors),
            vec!["location_name: must be at least 10 characters"]
        );

        let ok = Step2LocationDto {
            location_name: "Behind the north gate of Chuo Park".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_flow_response_serializes_with_kind_tag() {
        let resp = WizardStepResponse::Advance {
            next: WizardStep::Step2,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["kind"], "advance");
        assert_eq!(value["next"], "step2");

        let redirect = WizardStepResponse::missing_draft();
        let value = serde_json::to_value(&redirect).unwrap();
        assert_eq!(value["kind"], "redirect");
        assert_eq!(value["to"], "step1");
    }
}
