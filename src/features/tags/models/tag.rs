use sqlx::FromRow;

/// Database model for a report category tag.
///
/// The vocabulary is fixture data; the wizard only ever reads it and refers
/// to tags by id so session state never holds live rows.
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}
