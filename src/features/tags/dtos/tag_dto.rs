use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::tags::models::Tag;

/// Response DTO for a category tag
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagResponseDto {
    pub id: i64,
    pub name: String,
}

impl From<Tag> for TagResponseDto {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}
