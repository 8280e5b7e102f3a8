use serde::Serialize;

// Testimony post plus its like/comment counters; the weighted score is
// filled in by the engagement service, not the query.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TestimonyRow {
    pub post_id: String,
    pub author_id: String,
    pub author_name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: String,
    pub likes_count: i64,
    pub comments_count: i64,
    #[sqlx(skip)]
    pub engagement_score: i64,
}
