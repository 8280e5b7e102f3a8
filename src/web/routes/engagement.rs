use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::featured_member_repo;
use crate::services::engagement_service;
use crate::web::middleware::auth::AuthenticatedMember;

#[derive(Debug, Deserialize, Default)]
pub struct WindowQuery {
    window_start: Option<String>,
    window_end: Option<String>,
}

// Explicit bounds win; otherwise the trailing week ending now.
fn resolve_window(query: &WindowQuery) -> (String, String) {
    let (default_start, default_end) = engagement_service::trailing_week_window(Utc::now());
    (
        query.window_start.clone().unwrap_or(default_start),
        query.window_end.clone().unwrap_or(default_end),
    )
}

pub async fn member_engagement_handler(
    Extension(_auth_member): Extension<AuthenticatedMember>,
    Path(member_id): Path<String>,
    Query(query): Query<WindowQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let (window_start, window_end) = resolve_window(&query);

    match engagement_service::compute_member_engagement_score(
        &pool,
        &member_id,
        &window_start,
        &window_end,
    )
    .await
    {
        Ok(score) => Json(json!({
            "member_id": member_id,
            "window_start": window_start,
            "window_end": window_end,
            "engagement_score": score,
        }))
        .into_response(),
        Err(e) => {
            warn!("Engagement score failed for {}: {}", member_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct TopTestimoniesQuery {
    window_start: Option<String>,
    window_end: Option<String>,
    limit: Option<usize>,
}

pub async fn top_testimonies_handler(
    Extension(_auth_member): Extension<AuthenticatedMember>,
    Query(query): Query<TopTestimoniesQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let window = WindowQuery {
        window_start: query.window_start.clone(),
        window_end: query.window_end.clone(),
    };
    let (window_start, window_end) = resolve_window(&window);
    let limit = query.limit.unwrap_or(5).clamp(1, 50);

    match engagement_service::top_testimonies_for_window(&pool, &window_start, &window_end, limit)
        .await
    {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            warn!("Top testimonies load failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn feature_member_handler(
    Extension(_auth_member): Extension<AuthenticatedMember>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let (window_start, window_end) = engagement_service::trailing_week_window(Utc::now());

    match engagement_service::select_and_feature_top_member(&pool, &window_start, &window_end)
        .await
    {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => {
            warn!("Member-of-the-week selection failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn spotlight_handler(
    Extension(_auth_member): Extension<AuthenticatedMember>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    match featured_member_repo::load_spotlight(&pool).await {
        Ok(spotlight) => Json(spotlight).into_response(),
        Err(e) => {
            warn!("Spotlight load failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
