use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::submissions::dtos::{
    is_photo_mime_allowed, CoordinatesDto, PendingPhotoDto, Step2LocationDto, WizardStep,
    WizardStepResponse, MAX_PHOTO_BYTES,
};
use crate::features::submissions::models::PendingFile;
use crate::features::submissions::services::{CommitEngine, DraftService};
use crate::features::tags::services::TagService;
use crate::features::reports::dtos::ReportResponseDto;
use crate::shared::types::ApiResponse;
use crate::shared::validation::{flatten_validation_errors, FieldErrors};

/// State for the wizard handlers
#[derive(Clone)]
pub struct WizardState {
    pub drafts: Arc<DraftService>,
    pub tags: Arc<TagService>,
    pub commit: Arc<dyn CommitEngine>,
}

/// Step 1 form: photo, category and comment capture
///
/// Re-entry is idempotent and prefills from the stored draft. Stale
/// coordinates from a previously abandoned attempt are dropped here so they
/// never leak into a fresh submission.
#[utoipa::path(
    get,
    path = "/api/submissions/wizard/step1",
    responses(
        (status = 200, description = "Step 1 form state", body = ApiResponse<WizardStepResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn step1_form(
    user: AuthenticatedUser,
    State(state): State<WizardState>,
) -> Result<Json<ApiResponse<WizardStepResponse>>> {
    state.drafts.clear_coordinates(&user.sub).await?;

    let draft = state.drafts.load(&user.sub).await?;
    let pending = state.drafts.load_pending_file(&user.sub).await?;

    let response = WizardStepResponse::Step1Form {
        comment: draft.comment,
        tag_id: draft.tag_ids.first().copied(),
        photo: pending.as_ref().map(PendingPhotoDto::from),
    };
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Step 1 submission: multipart with `photo`, `tag` and `comment`
///
/// On success the photo replaces any previous pending file and the fields
/// merge into the existing draft, preserving carried-over coordinates. On
/// validation failure nothing in the session is touched.
#[utoipa::path(
    post,
    path = "/api/submissions/wizard/step1",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields: photo (required image), tag (required category id), comment (required text)",
    ),
    responses(
        (status = 200, description = "Advance to step 2", body = ApiResponse<WizardStepResponse>),
        (status = 400, description = "Validation error; draft untouched"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn step1_submit(
    user: AuthenticatedUser,
    State(state): State<WizardState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<WizardStepResponse>>> {
    let mut photo: Option<(String, String, Vec<u8>)> = None;
    let mut tag_raw: Option<String> = None;
    let mut comment: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photo" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read photo bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;
                photo = Some((filename, content_type, data.to_vec()));
            }
            "tag" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read tag field: {}", e))
                })?;
                if !text.is_empty() {
                    tag_raw = Some(text);
                }
            }
            "comment" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read comment field: {}", e))
                })?;
                comment = Some(text);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let mut errors = FieldErrors::new();

    match &photo {
        None => errors.add("photo", "is required"),
        Some((_, content_type, data)) => {
            if data.is_empty() {
                errors.add("photo", "is required");
            } else if data.len() > MAX_PHOTO_BYTES {
                errors.add(
                    "photo",
                    format!("exceeds the maximum size of {} bytes", MAX_PHOTO_BYTES),
                );
            }
            if !is_photo_mime_allowed(content_type) {
                errors.add("photo", format!("unsupported type '{}'", content_type));
            }
        }
    }

    if comment.as_deref().map(|c| c.trim().is_empty()).unwrap_or(true) {
        errors.add("comment", "is required");
    }

    let tag_id = match tag_raw.as_deref().map(str::parse::<i64>) {
        Some(Ok(id)) => Some(id),
        Some(Err(_)) => {
            errors.add("tag", "must be a category id");
            None
        }
        None => {
            errors.add("tag", "is required");
            None
        }
    };

    // Tag ids come from a fixed vocabulary; unknown ids are a form error
    if let Some(id) = tag_id {
        if state.tags.find_by_ids(&[id]).await?.is_empty() {
            errors.add("tag", "is not a known category");
        }
    }

    if !errors.is_empty() {
        return Err(AppError::ValidationErrors(errors.into_messages()));
    }

    // The error checks above guarantee both are present here
    let Some((filename, content_type, data)) = photo else {
        return Err(AppError::BadRequest("Photo field is missing".to_string()));
    };
    let Some(tag_id) = tag_id else {
        return Err(AppError::BadRequest("Tag field is missing".to_string()));
    };
    let pending = PendingFile::from_bytes(&filename, &content_type, &data);
    state.drafts.save_pending_file(&user.sub, &pending).await?;

    // Merge into the existing draft so previously captured coordinates survive
    let mut draft = state.drafts.load(&user.sub).await?;
    draft.comment = comment;
    draft.tag_ids = vec![tag_id];
    state.drafts.save(&user.sub, &draft).await?;

    Ok(Json(ApiResponse::success(
        Some(WizardStepResponse::Advance {
            next: WizardStep::Step2,
        }),
        None,
        None,
    )))
}

/// Step 2 form: location detail capture
#[utoipa::path(
    get,
    path = "/api/submissions/wizard/step2",
    responses(
        (status = 200, description = "Step 2 form state, or redirect to step 1 when no draft exists", body = ApiResponse<WizardStepResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn step2_form(
    user: AuthenticatedUser,
    State(state): State<WizardState>,
) -> Result<Json<ApiResponse<WizardStepResponse>>> {
    if !state.drafts.exists(&user.sub).await? {
        return Ok(Json(ApiResponse::success(
            Some(WizardStepResponse::missing_draft()),
            None,
            None,
        )));
    }

    let draft = state.drafts.load(&user.sub).await?;
    Ok(Json(ApiResponse::success(
        Some(WizardStepResponse::Step2Form {
            location_name: draft.location_name,
        }),
        None,
        None,
    )))
}

/// Step 2 submission: location detail text, minimum 10 characters
#[utoipa::path(
    post,
    path = "/api/submissions/wizard/step2",
    request_body = Step2LocationDto,
    responses(
        (status = 200, description = "Advance to step 3, or redirect to step 1 when no draft exists", body = ApiResponse<WizardStepResponse>),
        (status = 400, description = "Validation error; draft untouched"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn step2_submit(
    user: AuthenticatedUser,
    State(state): State<WizardState>,
    AppJson(dto): AppJson<Step2LocationDto>,
) -> Result<Json<ApiResponse<WizardStepResponse>>> {
    if !state.drafts.exists(&user.sub).await? {
        return Ok(Json(ApiResponse::success(
            Some(WizardStepResponse::missing_draft()),
            None,
            None,
        )));
    }

    if let Err(e) = dto.validate() {
        return Err(AppError::ValidationErrors(flatten_validation_errors(&e)));
    }

    let mut draft = state.drafts.load(&user.sub).await?;
    draft.location_name = Some(dto.location_name);
    state.drafts.save(&user.sub, &draft).await?;

    Ok(Json(ApiResponse::success(
        Some(WizardStepResponse::Advance {
            next: WizardStep::Step3,
        }),
        None,
        None,
    )))
}

/// Step 3 summary: read-only view of the accumulated draft.
/// Coordinates from client-side geolocation may arrive as query parameters
/// and overwrite whatever the draft held.
#[utoipa::path(
    get,
    path = "/api/submissions/wizard/step3",
    params(
        ("latitude" = Option<String>, Query, description = "Raw latitude from client geolocation"),
        ("longitude" = Option<String>, Query, description = "Raw longitude from client geolocation")
    ),
    responses(
        (status = 200, description = "Draft summary, or redirect to step 1 when no draft exists", body = ApiResponse<WizardStepResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn step3_form(
    user: AuthenticatedUser,
    State(state): State<WizardState>,
    Query(coords): Query<CoordinatesDto>,
) -> Result<Json<ApiResponse<WizardStepResponse>>> {
    if !state.drafts.exists(&user.sub).await? {
        return Ok(Json(ApiResponse::success(
            Some(WizardStepResponse::missing_draft()),
            None,
            None,
        )));
    }

    let draft = merge_coordinates(&state, &user.sub, &coords).await?;
    let pending = state.drafts.load_pending_file(&user.sub).await?;

    let tags = state.tags.find_by_ids(&draft.tag_ids).await?;
    let response = WizardStepResponse::Summary {
        comment: draft.comment,
        tag_names: tags.into_iter().map(|t| t.name).collect(),
        location_name: draft.location_name,
        latitude: draft.latitude,
        longitude: draft.longitude,
        photo: pending.as_ref().map(PendingPhotoDto::from),
    };
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Step 3 confirmation: commit the draft
///
/// Success clears the session state. A validation failure discards the draft
/// and redirects to step 1 for a clean retry. Any other failure keeps the
/// draft so the user loses nothing.
#[utoipa::path(
    post,
    path = "/api/submissions/wizard/step3",
    request_body = CoordinatesDto,
    responses(
        (status = 200, description = "Report created, or redirect to step 1 with validation messages", body = ApiResponse<WizardStepResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage failure; draft preserved")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn step3_submit(
    user: AuthenticatedUser,
    State(state): State<WizardState>,
    AppJson(coords): AppJson<CoordinatesDto>,
) -> Result<Json<ApiResponse<WizardStepResponse>>> {
    if !state.drafts.exists(&user.sub).await? {
        return Ok(Json(ApiResponse::success(
            Some(WizardStepResponse::missing_draft()),
            None,
            None,
        )));
    }

    let draft = merge_coordinates(&state, &user.sub, &coords).await?;
    let pending = state.drafts.load_pending_file(&user.sub).await?;

    match state.commit.commit(&draft, pending.as_ref(), &user.sub).await {
        Ok((report, tags)) => {
            state.drafts.clear(&user.sub).await?;
            let dto = ReportResponseDto::from_report(
                report,
                tags.into_iter().map(|t| t.into()).collect(),
            );
            Ok(Json(ApiResponse::success(
                Some(WizardStepResponse::Completed { report: dto }),
                Some("Report submitted".to_string()),
                None,
            )))
        }
        Err(AppError::ValidationErrors(errors)) => {
            // Discard rule: the accumulated draft is unfit to persist, so
            // force a clean retry rather than patching it in place.
            state.drafts.clear(&user.sub).await?;
            Ok(Json(ApiResponse::success(
                Some(WizardStepResponse::Redirect {
                    to: WizardStep::Step1,
                    notice: "Your submission could not be saved. Please start again.".to_string(),
                    errors,
                }),
                None,
                None,
            )))
        }
        // Draft deliberately preserved; the user can retry from step 1
        Err(e) => Err(e),
    }
}

/// Completion acknowledgment
#[utoipa::path(
    get,
    path = "/api/submissions/wizard/done",
    responses(
        (status = 200, description = "Submission acknowledged"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn done(_user: AuthenticatedUser) -> Json<ApiResponse<()>> {
    Json(ApiResponse::success(
        None,
        Some("Thank you. Your report has been submitted.".to_string()),
        None,
    ))
}

/// Overwrite draft coordinates with any values present in the request.
/// Returns the up-to-date draft either way.
async fn merge_coordinates(
    state: &WizardState,
    owner: &str,
    coords: &CoordinatesDto,
) -> Result<crate::features::submissions::models::ReportDraft> {
    let mut draft = state.drafts.load(owner).await?;

    if coords.latitude.is_some() || coords.longitude.is_some() {
        draft.latitude = coords.latitude.clone();
        draft.longitude = coords.longitude.clone();
        state.drafts.save(owner, &draft).await?;
    }

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;

    use crate::features::reports::models::{Report, ReportPriority, ReportStatus};
    use crate::features::submissions::models::{PendingFile, ReportDraft};
    use crate::features::tags::models::Tag;
    use crate::modules::session::MemorySessionStore;
    use crate::shared::test_helpers::create_citizen_user;

    enum CommitOutcome {
        Success,
        Invalid(Vec<String>),
        StorageFault,
    }

    struct ScriptedCommit {
        outcome: CommitOutcome,
    }

    #[async_trait]
    impl CommitEngine for ScriptedCommit {
        async fn commit(
            &self,
            draft: &ReportDraft,
            _pending: Option<&PendingFile>,
            owner: &str,
        ) -> Result<(Report, Vec<Tag>)> {
            match &self.outcome {
                CommitOutcome::Success => Ok((
                    sample_report(owner, draft),
                    vec![Tag {
                        id: 1,
                        name: "road_damage".to_string(),
                    }],
                )),
                CommitOutcome::Invalid(errors) => {
                    Err(AppError::ValidationErrors(errors.clone()))
                }
                CommitOutcome::StorageFault => {
                    Err(AppError::Internal("media directory unavailable".to_string()))
                }
            }
        }
    }

    fn sample_report(owner: &str, draft: &ReportDraft) -> Report {
        Report {
            id: 1,
            user_id: owner.to_string(),
            title: None,
            comment: draft.comment.clone().unwrap_or_default(),
            photo_key: "photos/2026/08/29/test.jpg".to_string(),
            photo_filename: "p.jpg".to_string(),
            photo_content_type: "image/jpeg".to_string(),
            photo_size: 2,
            latitude: 0.0,
            longitude: 0.0,
            location_name: draft.location_name.clone(),
            status: ReportStatus::New,
            priority: ReportPriority::Medium,
            admin_note: None,
            posted_at: Utc::now(),
            completed_at: None,
        }
    }

    fn state_with(outcome: CommitOutcome) -> WizardState {
        // Lazy pool: the handlers under test never reach a tag query
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        WizardState {
            drafts: Arc::new(DraftService::new(Arc::new(MemorySessionStore::new()))),
            tags: Arc::new(TagService::new(pool)),
            commit: Arc::new(ScriptedCommit { outcome }),
        }
    }

    async fn seed_draft(state: &WizardState, owner: &str) {
        let draft = ReportDraft {
            comment: Some("pothole near the school crossing".to_string()),
            tag_ids: vec![1],
            ..Default::default()
        };
        state.drafts.save(owner, &draft).await.unwrap();
        state
            .drafts
            .save_pending_file(
                owner,
                &PendingFile::from_bytes("p.jpg", "image/jpeg", b"\xff\xd8"),
            )
            .await
            .unwrap();
    }

    fn flow_body(resp: Json<ApiResponse<WizardStepResponse>>) -> WizardStepResponse {
        resp.0.data.unwrap()
    }

    #[tokio::test]
    async fn test_step3_success_clears_draft_and_pending_file() {
        let state = state_with(CommitOutcome::Success);
        let user = create_citizen_user();
        seed_draft(&state, &user.sub).await;

        let resp = step3_submit(
            user.clone(),
            State(state.clone()),
            AppJson(CoordinatesDto::default()),
        )
        .await
        .unwrap();

        match flow_body(resp) {
            WizardStepResponse::Completed { report } => {
                assert_eq!(report.comment, "pothole near the school crossing");
            }
            other => panic!("unexpected flow response: {:?}", other),
        }
        assert!(!state.drafts.exists(&user.sub).await.unwrap());
        assert!(state
            .drafts
            .load_pending_file(&user.sub)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_step3_validation_failure_discards_draft_and_redirects() {
        let state = state_with(CommitOutcome::Invalid(vec![
            "comment: is required".to_string(),
        ]));
        let user = create_citizen_user();
        seed_draft(&state, &user.sub).await;

        let resp = step3_submit(
            user.clone(),
            State(state.clone()),
            AppJson(CoordinatesDto::default()),
        )
        .await
        .unwrap();

        match flow_body(resp) {
            WizardStepResponse::Redirect { to, errors, .. } => {
                assert_eq!(to, WizardStep::Step1);
                assert_eq!(errors, vec!["comment: is required".to_string()]);
            }
            other => panic!("unexpected flow response: {:?}", other),
        }
        // discard rule: a fresh retry, nothing left in the session
        assert!(!state.drafts.exists(&user.sub).await.unwrap());
        assert!(state
            .drafts
            .load_pending_file(&user.sub)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_step3_storage_fault_preserves_draft() {
        let state = state_with(CommitOutcome::StorageFault);
        let user = create_citizen_user();
        seed_draft(&state, &user.sub).await;

        let result = step3_submit(
            user.clone(),
            State(state.clone()),
            AppJson(CoordinatesDto::default()),
        )
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        // the user loses nothing
        assert!(state.drafts.exists(&user.sub).await.unwrap());
        assert!(state
            .drafts
            .load_pending_file(&user.sub)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_step2_and_step3_without_draft_redirect_to_step1() {
        let state = state_with(CommitOutcome::Success);
        let user = create_citizen_user();

        let resp = step2_form(user.clone(), State(state.clone())).await.unwrap();
        match flow_body(resp) {
            WizardStepResponse::Redirect { to, .. } => assert_eq!(to, WizardStep::Step1),
            other => panic!("unexpected flow response: {:?}", other),
        }

        let resp = step2_submit(
            user.clone(),
            State(state.clone()),
            AppJson(Step2LocationDto {
                location_name: "Behind the north gate of Chuo Park".to_string(),
            }),
        )
        .await
        .unwrap();
        match flow_body(resp) {
            WizardStepResponse::Redirect { to, .. } => assert_eq!(to, WizardStep::Step1),
            other => panic!("unexpected flow response: {:?}", other),
        }

        let resp = step3_submit(
            user.clone(),
            State(state.clone()),
            AppJson(CoordinatesDto::default()),
        )
        .await
        .unwrap();
        match flow_body(resp) {
            WizardStepResponse::Redirect { to, .. } => assert_eq!(to, WizardStep::Step1),
            other => panic!("unexpected flow response: {:?}", other),
        }
    }
}
