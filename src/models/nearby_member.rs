use serde::Serialize;

// Row for the nearby-members list (members + computed distance).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NearbyMemberRow {
    pub member_id: String,
    pub name: Option<String>,
    pub location_text: Option<String>,
    pub main_photo_url: Option<String>,
    pub is_verified: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[sqlx(skip)]
    pub distance_miles: Option<f64>,
}
