#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberRow {
    pub name: Option<String>,
    pub email: Option<String>,
    pub about: Option<String>,
    pub location_text: Option<String>,
    pub main_photo_url: Option<String>,
    pub is_verified: Option<i64>,
    pub membership_level: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Option<String>,
    pub last_seen_at: Option<String>,
}

// Just the coordinate pair, for proximity lookups.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberCoordsRow {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DigestRecipientRow {
    pub member_id: String,
    pub name: Option<String>,
    pub email: String,
}
