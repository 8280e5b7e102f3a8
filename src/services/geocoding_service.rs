use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::services::proximity_service::GeoPoint;

#[derive(Debug, Serialize, Clone)]
pub struct Geocoded {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
}

#[derive(Debug, Deserialize)]
struct Geo {
    lat: Option<f64>,
    lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    formatted: Option<String>,
    display_name: Option<String>,
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(rename = "_geo")]
    geo: Option<Geo>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    hits: Option<Vec<GeocodeHit>>,
}

/// Resolve a free-text address to coordinates via the geocoding service.
/// Any failure (blank input, unreachable upstream, no usable hit) comes
/// back as None; callers keep the address text and carry on without
/// coordinates.
pub async fn geocode_address(address: &str) -> Option<Geocoded> {
    let address = address.trim();
    if address.len() < 2 {
        return None;
    }

    let base_url =
        std::env::var("GEOCODE_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let host_header =
        std::env::var("GEOCODE_SERVICE_HOST").unwrap_or_else(|_| "geocode.localhost".to_string());
    let api_key = std::env::var("GEOCODE_API_KEY").ok();

    let url = format!("{}/search", base_url.trim_end_matches('/'));
    let client = reqwest::Client::new();

    let mut req = client
        .get(&url)
        .query(&[("q", address), ("limit", "1")])
        .header("Host", host_header);

    if let Some(key) = api_key {
        req = req.header("x-api-key", key);
    }

    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("📍 Geocode upstream unreachable: {}", e);
            return None;
        }
    };

    if !resp.status().is_success() {
        warn!("📍 Geocode upstream non-OK: {}", resp.status());
        return None;
    }

    let parsed: GeocodeResponse = match resp.json().await {
        Ok(data) => data,
        Err(e) => {
            warn!("📍 Geocode upstream JSON parse failed: {}", e);
            return None;
        }
    };

    let result = best_hit(parsed.hits.unwrap_or_default());
    if result.is_none() {
        warn!("📍 No geocode result for '{}'", address);
    }
    result
}

// Upstream hit shapes vary per provider; take the first hit with a valid
// coordinate pair under any of the known field names.
fn best_hit(hits: Vec<GeocodeHit>) -> Option<Geocoded> {
    hits.into_iter().find_map(|hit| {
        let geo_lat = hit.geo.as_ref().and_then(|g| g.lat);
        let geo_lng = hit.geo.as_ref().and_then(|g| g.lng);
        let lat = geo_lat.or(hit.lat).or(hit.latitude)?;
        let lon = geo_lng.or(hit.lon).or(hit.longitude)?;
        let point = GeoPoint::new(lat, lon)?;

        Some(Geocoded {
            latitude: point.latitude,
            longitude: point.longitude,
            formatted_address: hit
                .formatted
                .or(hit.display_name)
                .or(hit.name)
                .unwrap_or_default(),
        })
    })
}
