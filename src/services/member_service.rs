use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::member_repo;
use crate::services::geocoding_service;

#[derive(Debug, Serialize)]
pub struct MemberProfileView {
    pub member_id: String,
    pub name: String,
    pub about: String,
    pub location_label: String,
    pub main_photo_id: Option<String>,
    pub is_verified: bool,
    pub membership_level: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_seen_label: Option<String>,
}

pub async fn load_member_profile_view(
    pool: &SqlitePool,
    member_id: &str,
) -> sqlx::Result<Option<MemberProfileView>> {
    let Some(row) = member_repo::load_member_profile(pool, member_id).await? else {
        return Ok(None);
    };

    let membership_level = row
        .membership_level
        .unwrap_or_else(|| "free".to_string())
        .to_lowercase();

    let location_label = row
        .location_text
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("")
        .to_string();

    let last_seen_label = row.last_seen_at.as_deref().and_then(format_last_seen);

    Ok(Some(MemberProfileView {
        member_id: member_id.to_string(),
        name: row.name.unwrap_or_default(),
        about: row.about.unwrap_or_default(),
        location_label,
        main_photo_id: row.main_photo_url,
        is_verified: row.is_verified.unwrap_or(0) == 1,
        membership_level,
        latitude: row.latitude,
        longitude: row.longitude,
        last_seen_label,
    }))
}

#[derive(Debug, Serialize)]
pub struct LocationUpdateView {
    pub location_text: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub geocoded: bool,
}

/// Store the member's free-text location, then try to resolve it to
/// coordinates. The text is saved even when geocoding finds nothing; the
/// caller just gets `geocoded: false` back.
pub async fn update_member_location(
    pool: &SqlitePool,
    member_id: &str,
    location_text: &str,
) -> sqlx::Result<Option<LocationUpdateView>> {
    let location_text = location_text.trim();

    let updated = member_repo::update_member_location_text(pool, member_id, location_text).await?;
    if updated == 0 {
        return Ok(None);
    }

    let Some(geocoded) = geocoding_service::geocode_address(location_text).await else {
        return Ok(Some(LocationUpdateView {
            location_text: location_text.to_string(),
            latitude: None,
            longitude: None,
            formatted_address: None,
            geocoded: false,
        }));
    };

    member_repo::update_member_geo(pool, member_id, geocoded.latitude, geocoded.longitude).await?;
    info!(
        "📍 Member {} location resolved to ({}, {})",
        member_id, geocoded.latitude, geocoded.longitude
    );

    Ok(Some(LocationUpdateView {
        location_text: location_text.to_string(),
        latitude: Some(geocoded.latitude),
        longitude: Some(geocoded.longitude),
        formatted_address: Some(geocoded.formatted_address),
        geocoded: true,
    }))
}

fn format_last_seen(raw: &str) -> Option<String> {
    // Stored as "2025-12-12T08:06:12.920925"; shown as "2025-12-12 08:06".
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut s = raw.to_string();
    if let Some(t_pos) = s.find('T') {
        s.replace_range(t_pos..=t_pos, " ");
    }
    Some(s.chars().take(16).collect())
}
