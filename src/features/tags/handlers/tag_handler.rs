use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::tags::dtos::TagResponseDto;
use crate::features::tags::services::TagService;
use crate::shared::types::ApiResponse;

/// List the category vocabulary for the submission form
#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "List of category tags", body = ApiResponse<Vec<TagResponseDto>>)
    ),
    tag = "tags"
)]
pub async fn list_tags(
    State(service): State<Arc<TagService>>,
) -> Result<Json<ApiResponse<Vec<TagResponseDto>>>> {
    let tags = service.list().await?;
    let dtos: Vec<TagResponseDto> = tags.into_iter().map(|t| t.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}
