#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityCountsRow {
    pub testimony_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
}

// A member with at least one qualifying post in the window.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QualifyingAuthorRow {
    pub member_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<String>,
}
