use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::member_service;
use crate::services::proximity_service;
use crate::web::middleware::auth::AuthenticatedMember;

pub async fn member_profile_handler(
    Extension(_auth_member): Extension<AuthenticatedMember>,
    Path(member_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let view = match member_service::load_member_profile_view(&pool, &member_id).await {
        Ok(v) => v,
        Err(e) => {
            warn!("Member profile load failed for {}: {}", member_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(view) = view else {
        return StatusCode::NOT_FOUND.into_response();
    };

    Json(view).into_response()
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    max_distance_miles: Option<f64>,
    limit: Option<usize>,
}

pub async fn nearby_members_handler(
    Extension(auth_member): Extension<AuthenticatedMember>,
    Query(query): Query<NearbyQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let max_distance = query.max_distance_miles.unwrap_or(25.0).clamp(1.0, 500.0);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    match proximity_service::find_nearby_members(&pool, &auth_member.id, max_distance, limit).await
    {
        Ok(members) => Json(members).into_response(),
        Err(e) => {
            warn!("Nearby members load failed for {}: {}", auth_member.id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationUpdateBody {
    location_text: String,
}

pub async fn update_location_handler(
    Extension(auth_member): Extension<AuthenticatedMember>,
    State(pool): State<SqlitePool>,
    Json(body): Json<LocationUpdateBody>,
) -> impl IntoResponse {
    if body.location_text.trim().is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let view = match member_service::update_member_location(
        &pool,
        &auth_member.id,
        &body.location_text,
    )
    .await
    {
        Ok(v) => v,
        Err(e) => {
            warn!("Location update failed for {}: {}", auth_member.id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(view) = view else {
        return StatusCode::NOT_FOUND.into_response();
    };

    Json(view).into_response()
}
