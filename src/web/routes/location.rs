use crate::services::geocoding_service;
use axum::{extract::Query, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    q: Option<String>,
}

pub async fn geocode_handler(Query(query): Query<GeocodeQuery>) -> impl IntoResponse {
    let q = match query.q.as_ref().map(|s| s.trim()).filter(|s| s.len() >= 2) {
        Some(v) => v,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(None::<geocoding_service::Geocoded>),
            )
        }
    };

    // A miss is a normal outcome (null body), not an error.
    (StatusCode::OK, Json(geocoding_service::geocode_address(q).await))
}
