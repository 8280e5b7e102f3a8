use sqlx::SqlitePool;

use crate::models::{DigestRecipientRow, MemberCoordsRow, MemberRow};

pub const SQL_LOAD_MEMBER_PROFILE: &str = r#"
SELECT
    name,
    email,
    about,
    location_text,
    main_photo_url,
    is_verified,
    membership_level,
    latitude,
    longitude,
    created_at,
    last_seen_at
FROM members
WHERE member_id = ?1
  AND (is_deleted = 0 OR is_deleted IS NULL)
LIMIT 1
"#;

pub const SQL_LOAD_MEMBER_COORDS: &str = r#"
SELECT
    latitude,
    longitude
FROM members
WHERE member_id = ?1
  AND (is_deleted = 0 OR is_deleted IS NULL)
LIMIT 1
"#;

pub const SQL_UPDATE_MEMBER_LOCATION_TEXT: &str = r#"
UPDATE members
SET location_text = ?2
WHERE member_id = ?1
  AND (is_deleted = 0 OR is_deleted IS NULL)
"#;

pub const SQL_UPDATE_MEMBER_GEO: &str = r#"
UPDATE members
SET latitude = ?2, longitude = ?3
WHERE member_id = ?1
  AND (is_deleted = 0 OR is_deleted IS NULL)
"#;

pub const SQL_LIST_DIGEST_RECIPIENTS: &str = r#"
SELECT
    member_id,
    name,
    email
FROM members
WHERE digest_opt_in = 1
  AND email IS NOT NULL
  AND email != ''
  AND (is_deleted = 0 OR is_deleted IS NULL)
ORDER BY member_id
"#;

pub async fn load_member_profile(
    pool: &SqlitePool,
    member_id: &str,
) -> sqlx::Result<Option<MemberRow>> {
    sqlx::query_as::<_, MemberRow>(SQL_LOAD_MEMBER_PROFILE)
        .bind(member_id)
        .fetch_optional(pool)
        .await
}

pub async fn load_member_coords(
    pool: &SqlitePool,
    member_id: &str,
) -> sqlx::Result<Option<MemberCoordsRow>> {
    sqlx::query_as::<_, MemberCoordsRow>(SQL_LOAD_MEMBER_COORDS)
        .bind(member_id)
        .fetch_optional(pool)
        .await
}

pub async fn update_member_location_text(
    pool: &SqlitePool,
    member_id: &str,
    location_text: &str,
) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_UPDATE_MEMBER_LOCATION_TEXT)
        .bind(member_id)
        .bind(location_text)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn update_member_geo(
    pool: &SqlitePool,
    member_id: &str,
    latitude: f64,
    longitude: f64,
) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_UPDATE_MEMBER_GEO)
        .bind(member_id)
        .bind(latitude)
        .bind(longitude)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_digest_recipients(pool: &SqlitePool) -> sqlx::Result<Vec<DigestRecipientRow>> {
    sqlx::query_as::<_, DigestRecipientRow>(SQL_LIST_DIGEST_RECIPIENTS)
        .fetch_all(pool)
        .await
}
