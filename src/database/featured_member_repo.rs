use sqlx::SqlitePool;

use crate::models::{FeaturedMemberRow, SpotlightRow};

// Single-row table: exactly one featured member at a time, replaced on
// each selection run.
pub const SQL_LOAD_FEATURED_MEMBER: &str = r#"
SELECT member_id, featured_at
FROM featured_member
WHERE id = 1
"#;

pub const SQL_LOAD_SPOTLIGHT: &str = r#"
SELECT
    f.member_id,
    m.name,
    m.main_photo_url,
    f.featured_at
FROM featured_member f
JOIN members m ON m.member_id = f.member_id
WHERE f.id = 1
  AND (m.is_deleted = 0 OR m.is_deleted IS NULL)
"#;

pub const SQL_REPLACE_FEATURED_MEMBER: &str = r#"
INSERT OR REPLACE INTO featured_member (id, member_id, featured_at)
VALUES (1, ?1, ?2)
"#;

pub async fn load_featured_member(pool: &SqlitePool) -> sqlx::Result<Option<FeaturedMemberRow>> {
    sqlx::query_as::<_, FeaturedMemberRow>(SQL_LOAD_FEATURED_MEMBER)
        .fetch_optional(pool)
        .await
}

pub async fn load_spotlight(pool: &SqlitePool) -> sqlx::Result<Option<SpotlightRow>> {
    sqlx::query_as::<_, SpotlightRow>(SQL_LOAD_SPOTLIGHT)
        .fetch_optional(pool)
        .await
}

pub async fn replace_featured_member(
    pool: &SqlitePool,
    member_id: &str,
    featured_at: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_REPLACE_FEATURED_MEMBER)
        .bind(member_id)
        .bind(featured_at)
        .execute(pool)
        .await?;
    Ok(())
}
