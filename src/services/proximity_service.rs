use sqlx::SqlitePool;

use crate::database::{member_repo, nearby_repo};
use crate::models::NearbyMemberRow;

const EARTH_RADIUS_MILES: f64 = 3959.0;
const MILES_PER_DEGREE_LAT: f64 = 69.0;

/// A validated coordinate pair in decimal degrees. Out-of-range or
/// non-finite input never reaches the trigonometry below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Option<GeoPoint> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
            return None;
        }
        Some(GeoPoint {
            latitude,
            longitude,
        })
    }
}

/// Great-circle distance in statute miles, rounded to one decimal.
/// Identical points yield exactly 0.0; symmetric in its arguments.
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let to_rad = |deg: f64| deg.to_radians();
    let dlat = to_rad(b.latitude - a.latitude);
    let dlon = to_rad(b.longitude - a.longitude);
    let h = (dlat / 2.0).sin().powi(2)
        + to_rad(a.latitude).cos() * to_rad(b.latitude).cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    round_to_tenth(EARTH_RADIUS_MILES * c)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Degree bounding box around a center point, used to prefilter nearby
/// candidates in SQL before the exact distance pass.
fn bounding_box(center: GeoPoint, radius_miles: f64) -> (f64, f64, f64, f64) {
    let lat_change = radius_miles / MILES_PER_DEGREE_LAT;
    let lat_rad = center.latitude.to_radians();
    let lon_change = (radius_miles / MILES_PER_DEGREE_LAT) / lat_rad.cos().abs();

    (
        center.latitude - lat_change,
        center.latitude + lat_change,
        center.longitude - lon_change,
        center.longitude + lon_change,
    )
}

/// Members within `max_distance_miles` of the querying member, nearest
/// first, with the computed distance attached. A member without stored
/// coordinates gets an empty result, not an error; the querying member is
/// never part of their own results.
pub async fn find_nearby_members(
    pool: &SqlitePool,
    auth_member_id: &str,
    max_distance_miles: f64,
    limit: usize,
) -> sqlx::Result<Vec<NearbyMemberRow>> {
    let Some(coords) = member_repo::load_member_coords(pool, auth_member_id).await? else {
        return Ok(Vec::new());
    };
    let (Some(lat), Some(lon)) = (coords.latitude, coords.longitude) else {
        return Ok(Vec::new());
    };
    let Some(origin) = GeoPoint::new(lat, lon) else {
        return Ok(Vec::new());
    };

    let bbox = bounding_box(origin, max_distance_miles);
    let rows = nearby_repo::load_nearby_candidates(pool, auth_member_id, Some(bbox)).await?;

    let mut members = Vec::new();
    for mut member in rows {
        let Some(point) = member
            .latitude
            .zip(member.longitude)
            .and_then(|(lat, lon)| GeoPoint::new(lat, lon))
        else {
            continue;
        };

        let dist = haversine_miles(origin, point);
        if dist > max_distance_miles {
            continue;
        }
        member.distance_miles = Some(dist);
        members.push(member);
    }

    members.sort_by(|a, b| {
        a.distance_miles
            .unwrap_or(f64::MAX)
            .partial_cmp(&b.distance_miles.unwrap_or(f64::MAX))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    members.truncate(limit);

    Ok(members)
}
