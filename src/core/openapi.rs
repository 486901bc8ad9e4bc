use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::features::reports::models as reports_models;
use crate::features::submissions::{dtos as submissions_dtos, handlers as submissions_handlers};
use crate::features::tags::dtos as tags_dtos;
use crate::features::tags::handlers as tags_handlers;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Tags (public)
        tags_handlers::list_tags,
        // Submission wizard
        submissions_handlers::step1_form,
        submissions_handlers::step1_submit,
        submissions_handlers::step2_form,
        submissions_handlers::step2_submit,
        submissions_handlers::step3_form,
        submissions_handlers::step3_submit,
        submissions_handlers::done,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::list_all_reports,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
    ),
    components(
        schemas(
            // Shared
            Meta,
            auth::model::AuthenticatedUser,
            // Tags
            tags_dtos::TagResponseDto,
            ApiResponse<Vec<tags_dtos::TagResponseDto>>,
            // Submission wizard
            submissions_dtos::WizardStep,
            submissions_dtos::WizardStepResponse,
            submissions_dtos::PendingPhotoDto,
            submissions_dtos::Step2LocationDto,
            submissions_dtos::CoordinatesDto,
            ApiResponse<submissions_dtos::WizardStepResponse>,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportPriority,
            reports_dtos::PhotoMetaDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::UpdateReportStatusDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
        )
    ),
    tags(
        (name = "tags", description = "Report category vocabulary (public)"),
        (name = "submissions", description = "Multi-step report submission wizard"),
        (name = "reports", description = "Submitted reports and staff triage"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
