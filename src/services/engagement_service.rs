use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

use crate::database::{engagement_repo, featured_member_repo, notice_repo};
use crate::models::{ActivityCountsRow, QualifyingAuthorRow, TestimonyRow};
use crate::services::notify_service;

// Fixed scoring weights. Posting a testimony counts for more than the
// engagement it attracts.
pub const TESTIMONY_WEIGHT: i64 = 10;
pub const LIKE_WEIGHT: i64 = 2;
pub const COMMENT_WEIGHT: i64 = 3;

pub fn format_timestamp(t: DateTime<Utc>) -> String {
    // Matches the stored ISO-8601 TEXT convention, so string comparison
    // stays chronological.
    t.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// The trailing seven-day window ending at `now`, as (start, end) bounds.
pub fn trailing_week_window(now: DateTime<Utc>) -> (String, String) {
    let start = now - Duration::days(7);
    (format_timestamp(start), format_timestamp(now))
}

pub fn weighted_member_score(counts: &ActivityCountsRow) -> i64 {
    counts.testimony_count * TESTIMONY_WEIGHT
        + counts.like_count * LIKE_WEIGHT
        + counts.comment_count * COMMENT_WEIGHT
}

pub fn weighted_post_score(likes_count: i64, comments_count: i64) -> i64 {
    likes_count * LIKE_WEIGHT + comments_count * COMMENT_WEIGHT
}

/// Weighted activity score for one member over the window. A member with
/// no activity scores 0; this never fails for an unknown member.
pub async fn compute_member_engagement_score(
    pool: &SqlitePool,
    member_id: &str,
    window_start: &str,
    window_end: &str,
) -> sqlx::Result<i64> {
    let counts =
        engagement_repo::load_activity_counts(pool, member_id, window_start, window_end).await?;
    Ok(weighted_member_score(&counts))
}

/// Testimonies from the window ranked by score, highest first; equal
/// scores put the most recent post first.
pub async fn top_testimonies_for_window(
    pool: &SqlitePool,
    window_start: &str,
    window_end: &str,
    limit: usize,
) -> sqlx::Result<Vec<TestimonyRow>> {
    let mut rows =
        engagement_repo::list_window_testimonies(pool, window_start, window_end).await?;
    for row in rows.iter_mut() {
        row.engagement_score = weighted_post_score(row.likes_count, row.comments_count);
    }
    rows.sort_by(|a, b| {
        b.engagement_score
            .cmp(&a.engagement_score)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    rows.truncate(limit);
    Ok(rows)
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedMemberView {
    pub member_id: String,
    pub name: Option<String>,
    pub testimony_count: i64,
    pub total_likes: i64,
    pub engagement_score: i64,
}

#[derive(Debug, Serialize)]
pub struct FeatureOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<FeaturedMemberView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

struct ScoredCandidate {
    author: QualifyingAuthorRow,
    counts: ActivityCountsRow,
    score: i64,
}

// Highest score wins; ties go to the earliest account, then the lowest
// member id, so repeated runs over the same window agree.
fn rank_candidates(mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    candidates.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| {
                let a_created = a.author.created_at.as_deref().unwrap_or("");
                let b_created = b.author.created_at.as_deref().unwrap_or("");
                a_created.cmp(b_created)
            })
            .then_with(|| a.author.member_id.cmp(&b.author.member_id))
    });
    candidates
}

/// Member-of-the-Week selection: score every member with a qualifying
/// post in the window, feature the winner, then notify the site operator.
/// The notification is best-effort; the featuring write stands even when
/// it fails.
pub async fn select_and_feature_top_member(
    pool: &SqlitePool,
    window_start: &str,
    window_end: &str,
) -> sqlx::Result<FeatureOutcome> {
    let authors = engagement_repo::list_qualifying_authors(pool, window_start, window_end).await?;
    if authors.is_empty() {
        return Ok(FeatureOutcome {
            success: false,
            member: None,
            reason: Some("No eligible members".to_string()),
        });
    }

    let mut candidates = Vec::with_capacity(authors.len());
    for author in authors {
        let counts =
            engagement_repo::load_activity_counts(pool, &author.member_id, window_start, window_end)
                .await?;
        let score = weighted_member_score(&counts);
        candidates.push(ScoredCandidate {
            author,
            counts,
            score,
        });
    }

    let ranked = rank_candidates(candidates);
    let top = &ranked[0];

    let featured_at = format_timestamp(Utc::now());
    featured_member_repo::replace_featured_member(pool, &top.author.member_id, &featured_at)
        .await?;

    let view = FeaturedMemberView {
        member_id: top.author.member_id.clone(),
        name: top.author.name.clone(),
        testimony_count: top.counts.testimony_count,
        total_likes: top.counts.like_count,
        engagement_score: top.score,
    };

    notify_operator_of_feature(pool, &top.author, &view, &featured_at).await;

    Ok(FeatureOutcome {
        success: true,
        member: Some(view),
        reason: None,
    })
}

fn member_of_week_subject(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => format!("Member of the Week: {}", name.trim()),
        _ => "Member of the Week selected".to_string(),
    }
}

async fn notify_operator_of_feature(
    pool: &SqlitePool,
    author: &QualifyingAuthorRow,
    view: &FeaturedMemberView,
    featured_at: &str,
) {
    let subject = member_of_week_subject(author.name.as_deref());
    let body = serde_json::json!({
        "member_id": view.member_id,
        "name": view.name,
        "email": author.email,
        "testimony_count": view.testimony_count,
        "total_likes": view.total_likes,
        "engagement_score": view.engagement_score,
    });

    let notice_id = Uuid::new_v4().to_string();
    let insert = notice_repo::insert_operator_notice(
        pool,
        notice_repo::NewOperatorNotice {
            notice_id: &notice_id,
            kind: "member_of_the_week",
            subject: &subject,
            body: &body.to_string(),
            created_at: featured_at,
        },
    )
    .await;
    if let Err(e) = insert {
        warn!("🏅 Could not record member-of-the-week notice: {}", e);
    }

    let html = format!(
        "<p>{} was featured as Member of the Week ({} testimonies, {} likes).</p>",
        view.name.as_deref().unwrap_or(&view.member_id),
        view.testimony_count,
        view.total_likes
    );
    if let Err(e) =
        notify_service::send_email(&notify_service::operator_email(), &subject, &html).await
    {
        warn!(
            "🏅 Member-of-the-week notification failed (featuring stands): {}",
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[test]
    fn member_score_uses_fixed_weights() {
        let counts = ActivityCountsRow {
            testimony_count: 2,
            like_count: 3,
            comment_count: 1,
        };
        assert_eq!(weighted_member_score(&counts), 29);
    }

    #[test]
    fn zero_activity_scores_zero() {
        let counts = ActivityCountsRow {
            testimony_count: 0,
            like_count: 0,
            comment_count: 0,
        };
        assert_eq!(weighted_member_score(&counts), 0);
    }

    #[test]
    fn post_score_weighs_likes_and_comments() {
        assert_eq!(weighted_post_score(5, 2), 16);
        assert_eq!(weighted_post_score(0, 0), 0);
    }

    #[test]
    fn trailing_week_window_spans_seven_days() {
        let now = DateTime::parse_from_rfc3339("2026-02-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let (start, end) = trailing_week_window(now);
        assert_eq!(start, "2026-02-03T12:00:00.000000");
        assert_eq!(end, "2026-02-10T12:00:00.000000");
        assert!(start < end);
    }

    fn candidate(member_id: &str, created_at: &str, score: i64) -> ScoredCandidate {
        ScoredCandidate {
            author: QualifyingAuthorRow {
                member_id: member_id.to_string(),
                name: Some(format!("Member {}", member_id)),
                email: Some(format!("{}@example.com", member_id)),
                created_at: Some(created_at.to_string()),
            },
            counts: ActivityCountsRow {
                testimony_count: 0,
                like_count: 0,
                comment_count: 0,
            },
            score,
        }
    }

    #[test]
    fn ranking_prefers_higher_scores() {
        let ranked = rank_candidates(vec![
            candidate("a", "2025-01-01T00:00:00.000000", 10),
            candidate("b", "2025-01-01T00:00:00.000000", 30),
        ]);
        assert_eq!(ranked[0].author.member_id, "b");
    }

    #[test]
    fn ranking_breaks_ties_by_earliest_account_then_lowest_id() {
        let ranked = rank_candidates(vec![
            candidate("c", "2025-06-01T00:00:00.000000", 20),
            candidate("b", "2025-01-01T00:00:00.000000", 20),
            candidate("a", "2025-06-01T00:00:00.000000", 20),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|c| c.author.member_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn subject_falls_back_without_a_name() {
        assert_eq!(
            member_of_week_subject(Some("Ruth")),
            "Member of the Week: Ruth"
        );
        assert_eq!(member_of_week_subject(None), "Member of the Week selected");
        assert_eq!(
            member_of_week_subject(Some("  ")),
            "Member of the Week selected"
        );
    }

    const WINDOW_START: &str = "2026-02-01T00:00:00.000000";
    const WINDOW_END: &str = "2026-02-08T00:00:00.000000";

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let schema = [
            r#"
CREATE TABLE members (
    member_id TEXT PRIMARY KEY,
    name TEXT,
    email TEXT,
    digest_opt_in INTEGER,
    latitude REAL,
    longitude REAL,
    is_deleted INTEGER,
    created_at TEXT
)
            "#,
            r#"
CREATE TABLE posts (
    post_id TEXT PRIMARY KEY,
    author_id TEXT NOT NULL,
    title TEXT,
    content TEXT,
    category TEXT NOT NULL,
    is_deleted INTEGER,
    created_at TEXT NOT NULL
)
            "#,
            r#"
CREATE TABLE post_likes (
    like_id TEXT PRIMARY KEY,
    post_id TEXT NOT NULL,
    member_id TEXT NOT NULL,
    created_at TEXT
)
            "#,
            r#"
CREATE TABLE comments (
    comment_id TEXT PRIMARY KEY,
    post_id TEXT NOT NULL,
    author_id TEXT NOT NULL,
    created_at TEXT NOT NULL
)
            "#,
            r#"
CREATE TABLE featured_member (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    member_id TEXT NOT NULL,
    featured_at TEXT NOT NULL
)
            "#,
            r#"
CREATE TABLE operator_notices (
    notice_id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    subject TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL
)
            "#,
        ];
        for stmt in schema {
            sqlx::query(stmt).execute(&pool).await.expect("create table");
        }
        pool
    }

    async fn insert_member(pool: &SqlitePool, id: &str, created_at: &str) {
        sqlx::query("INSERT INTO members (member_id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(id)
            .bind(format!("Member {}", id))
            .bind(format!("{}@example.com", id))
            .bind(created_at)
            .execute(pool)
            .await
            .expect("insert member");
    }

    async fn insert_post(pool: &SqlitePool, id: &str, author: &str, category: &str, created_at: &str) {
        sqlx::query(
            "INSERT INTO posts (post_id, author_id, title, category, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(id)
        .bind(author)
        .bind(format!("Post {}", id))
        .bind(category)
        .bind(created_at)
        .execute(pool)
        .await
        .expect("insert post");
    }

    async fn insert_like(pool: &SqlitePool, id: &str, post_id: &str) {
        sqlx::query("INSERT INTO post_likes (like_id, post_id, member_id) VALUES (?1, ?2, 'liker')")
            .bind(id)
            .bind(post_id)
            .execute(pool)
            .await
            .expect("insert like");
    }

    async fn insert_comment(pool: &SqlitePool, id: &str, post_id: &str, author: &str, created_at: &str) {
        sqlx::query(
            "INSERT INTO comments (comment_id, post_id, author_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(id)
        .bind(post_id)
        .bind(author)
        .bind(created_at)
        .execute(pool)
        .await
        .expect("insert comment");
    }

    #[tokio::test]
    async fn score_counts_only_qualifying_window_activity() {
        let pool = test_pool().await;
        insert_member(&pool, "ruth", "2025-01-01T00:00:00.000000").await;

        // Two qualifying posts with three likes between them, one comment.
        insert_post(&pool, "p1", "ruth", "testimony", "2026-02-02T10:00:00.000000").await;
        insert_post(&pool, "p2", "ruth", "vision", "2026-02-03T10:00:00.000000").await;
        insert_like(&pool, "l1", "p1").await;
        insert_like(&pool, "l2", "p1").await;
        insert_like(&pool, "l3", "p2").await;
        insert_comment(&pool, "c1", "p1", "ruth", "2026-02-04T10:00:00.000000").await;

        // Chat and prayer-room posts never qualify; neither does anything
        // outside the window.
        insert_post(&pool, "p3", "ruth", "chat", "2026-02-03T11:00:00.000000").await;
        insert_post(&pool, "p4", "ruth", "prayer", "2026-02-03T12:00:00.000000").await;
        insert_post(&pool, "p5", "ruth", "testimony", "2026-01-20T10:00:00.000000").await;
        insert_comment(&pool, "c2", "p1", "ruth", "2026-01-20T10:00:00.000000").await;

        let score = compute_member_engagement_score(&pool, "ruth", WINDOW_START, WINDOW_END)
            .await
            .unwrap();
        assert_eq!(score, 2 * 10 + 3 * 2 + 3);
    }

    #[tokio::test]
    async fn score_is_zero_for_an_idle_member() {
        let pool = test_pool().await;
        insert_member(&pool, "idle", "2025-01-01T00:00:00.000000").await;

        let score = compute_member_engagement_score(&pool, "idle", WINDOW_START, WINDOW_END)
            .await
            .unwrap();
        assert_eq!(score, 0);
    }

    #[tokio::test]
    async fn top_testimonies_sort_by_score_then_recency() {
        let pool = test_pool().await;
        insert_member(&pool, "ruth", "2025-01-01T00:00:00.000000").await;

        insert_post(&pool, "low", "ruth", "testimony", "2026-02-02T10:00:00.000000").await;
        insert_post(&pool, "high", "ruth", "testimony", "2026-02-03T10:00:00.000000").await;
        insert_like(&pool, "l1", "high").await;
        insert_like(&pool, "l2", "high").await;

        // Same score as "low" but more recent, so it sorts first.
        insert_post(&pool, "tied", "ruth", "testimony", "2026-02-05T10:00:00.000000").await;

        // A vision post never shows up in the testimony ranking.
        insert_post(&pool, "vision", "ruth", "vision", "2026-02-05T11:00:00.000000").await;

        let rows = top_testimonies_for_window(&pool, WINDOW_START, WINDOW_END, 10)
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.post_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "tied", "low"]);
        assert_eq!(rows[0].engagement_score, 4);

        let truncated = top_testimonies_for_window(&pool, WINDOW_START, WINDOW_END, 2)
            .await
            .unwrap();
        assert_eq!(truncated.len(), 2);
    }

    #[tokio::test]
    async fn featuring_without_candidates_writes_nothing() {
        let pool = test_pool().await;
        insert_member(&pool, "quiet", "2025-01-01T00:00:00.000000").await;

        let outcome = select_and_feature_top_member(&pool, WINDOW_START, WINDOW_END)
            .await
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.reason.as_deref(), Some("No eligible members"));
        assert!(outcome.member.is_none());

        let featured = crate::database::featured_member_repo::load_featured_member(&pool)
            .await
            .unwrap();
        assert!(featured.is_none());
    }

    #[tokio::test]
    async fn featuring_picks_the_top_scorer_and_overwrites_previous_runs() {
        let pool = test_pool().await;
        insert_member(&pool, "ruth", "2025-01-01T00:00:00.000000").await;
        insert_member(&pool, "noah", "2025-01-02T00:00:00.000000").await;

        insert_post(&pool, "r1", "ruth", "testimony", "2026-02-02T10:00:00.000000").await;
        insert_post(&pool, "n1", "noah", "testimony", "2026-02-02T11:00:00.000000").await;
        insert_post(&pool, "n2", "noah", "testimony", "2026-02-03T11:00:00.000000").await;

        let outcome = select_and_feature_top_member(&pool, WINDOW_START, WINDOW_END)
            .await
            .unwrap();
        assert!(outcome.success);
        let member = outcome.member.unwrap();
        assert_eq!(member.member_id, "noah");
        assert_eq!(member.testimony_count, 2);

        let featured = crate::database::featured_member_repo::load_featured_member(&pool)
            .await
            .unwrap()
            .expect("featured row");
        assert_eq!(featured.member_id, "noah");

        // Ruth catches up; re-running replaces the singleton, last write
        // wins.
        insert_post(&pool, "r2", "ruth", "testimony", "2026-02-04T10:00:00.000000").await;
        insert_like(&pool, "l1", "r1").await;

        let second = select_and_feature_top_member(&pool, WINDOW_START, WINDOW_END)
            .await
            .unwrap();
        assert_eq!(second.member.unwrap().member_id, "ruth");

        let featured = crate::database::featured_member_repo::load_featured_member(&pool)
            .await
            .unwrap()
            .expect("featured row");
        assert_eq!(featured.member_id, "ruth");
    }
}
