#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CurrentUserRow {
    pub member_id: String,
}
