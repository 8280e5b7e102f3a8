use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeaturedMemberRow {
    pub member_id: String,
    pub featured_at: String,
}

// Spotlight view row: the featured member joined onto their profile.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SpotlightRow {
    pub member_id: String,
    pub name: Option<String>,
    pub main_photo_url: Option<String>,
    pub featured_at: String,
}
