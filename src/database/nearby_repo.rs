use sqlx::{sqlite::SqliteArguments, Arguments, SqlitePool};

use crate::models::NearbyMemberRow;

pub const SQL_NEARBY_BASE: &str = r#"
SELECT
    m.member_id, m.name, m.location_text, m.main_photo_url, m.is_verified,
    m.latitude, m.longitude
FROM members m
WHERE (m.is_deleted = 0 OR m.is_deleted IS NULL)
    AND m.latitude IS NOT NULL
    AND m.longitude IS NOT NULL
"#;

pub async fn load_nearby_candidates(
    pool: &SqlitePool,
    auth_member_id: &str,
    bbox: Option<(f64, f64, f64, f64)>,
) -> sqlx::Result<Vec<NearbyMemberRow>> {
    let mut sql = String::from(SQL_NEARBY_BASE);
    let mut args = SqliteArguments::default();

    sql.push_str(" AND m.member_id != ?");
    args.add(auth_member_id);

    if let Some((min_lat, max_lat, min_lon, max_lon)) = bbox {
        sql.push_str(" AND latitude BETWEEN ? AND ? AND longitude BETWEEN ? AND ?");
        args.add(min_lat);
        args.add(max_lat);
        args.add(min_lon);
        args.add(max_lon);
    }

    sql.push_str(" LIMIT 500");

    sqlx::query_as_with::<_, NearbyMemberRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}
