use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::digest_service;
use crate::services::engagement_service;
use crate::web::middleware::auth::AuthenticatedMember;

#[derive(Debug, Deserialize, Default)]
pub struct DigestQuery {
    limit: Option<usize>,
}

pub async fn weekly_digest_handler(
    Extension(_auth_member): Extension<AuthenticatedMember>,
    Query(query): Query<DigestQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let (window_start, window_end) = engagement_service::trailing_week_window(Utc::now());
    let limit = query.limit.unwrap_or(5).clamp(1, 20);

    match digest_service::build_weekly_digest(&pool, &window_start, &window_end, limit).await {
        Ok(digest) => Json(digest).into_response(),
        Err(e) => {
            warn!("Weekly digest build failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
