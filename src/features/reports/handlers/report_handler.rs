use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{ReportResponseDto, UpdateReportStatusDto};
use crate::features::reports::models::Report;
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
}

impl ReportState {
    async fn to_dto(&self, report: Report) -> Result<ReportResponseDto> {
        let tags = self.report_service.tags_for(report.id).await?;
        Ok(ReportResponseDto::from_report(
            report,
            tags.into_iter().map(|t| t.into()).collect(),
        ))
    }
}

/// List the authenticated user's own reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "List of user's reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = state.report_service.list_by_user(&user.sub).await?;

    let mut dtos = Vec::with_capacity(reports.len());
    for report in reports {
        dtos.push(state.to_dto(report).await?);
    }

    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Paginated listing across all users (staff only)
#[utoipa::path(
    get,
    path = "/api/reports/all",
    params(PaginationQuery),
    responses(
        (status = 200, description = "All reports, paginated", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_all_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    if !user.has_staff_access() {
        return Err(AppError::Forbidden("Staff access required".to_string()));
    }

    let (reports, total) = state.report_service.list_all(&pagination).await?;

    let mut dtos = Vec::with_capacity(reports.len());
    for report in reports {
        dtos.push(state.to_dto(report).await?);
    }

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a single report (owner or staff)
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_by_id(id).await?;

    // Owners see their own reports; everyone else needs staff access.
    // Report as not-found rather than forbidden to avoid leaking existence.
    if report.user_id != user.sub && !user.has_staff_access() {
        return Err(AppError::NotFound(format!("Report {} not found", id)));
    }

    let dto = state.to_dto(report).await?;
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

/// Update report status (staff only)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    if !user.has_staff_access() {
        return Err(AppError::Forbidden("Staff access required".to_string()));
    }

    let report = state
        .report_service
        .update_status(id, &dto, &user.sub)
        .await?;
    let dto = state.to_dto(report).await?;
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}
