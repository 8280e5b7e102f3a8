use sqlx::SqlitePool;

use crate::models::{ActivityCountsRow, QualifyingAuthorRow, TestimonyRow};

// A qualifying post is any non-chat, non-prayer-room post created inside
// the window. Timestamps are ISO-8601 TEXT, so lexical comparison is
// chronological comparison.
pub const SQL_LOAD_ACTIVITY_COUNTS: &str = r#"
SELECT
    (SELECT COUNT(*)
       FROM posts p
      WHERE p.author_id = ?1
        AND p.category NOT IN ('chat', 'prayer')
        AND p.created_at >= ?2 AND p.created_at <= ?3
        AND (p.is_deleted = 0 OR p.is_deleted IS NULL)) AS testimony_count,
    (SELECT COUNT(*)
       FROM post_likes l
       JOIN posts p ON p.post_id = l.post_id
      WHERE p.author_id = ?1
        AND p.category NOT IN ('chat', 'prayer')
        AND p.created_at >= ?2 AND p.created_at <= ?3
        AND (p.is_deleted = 0 OR p.is_deleted IS NULL)) AS like_count,
    (SELECT COUNT(*)
       FROM comments c
      WHERE c.author_id = ?1
        AND c.created_at >= ?2 AND c.created_at <= ?3) AS comment_count
"#;

pub const SQL_LIST_QUALIFYING_AUTHORS: &str = r#"
SELECT DISTINCT
    m.member_id,
    m.name,
    m.email,
    m.created_at
FROM members m
JOIN posts p ON p.author_id = m.member_id
WHERE p.category NOT IN ('chat', 'prayer')
    AND p.created_at >= ?1 AND p.created_at <= ?2
    AND (p.is_deleted = 0 OR p.is_deleted IS NULL)
    AND (m.is_deleted = 0 OR m.is_deleted IS NULL)
"#;

pub const SQL_LIST_WINDOW_TESTIMONIES: &str = r#"
SELECT
    p.post_id,
    p.author_id,
    m.name AS author_name,
    p.title,
    p.content,
    p.created_at,
    (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.post_id) AS likes_count,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.post_id) AS comments_count
FROM posts p
JOIN members m ON m.member_id = p.author_id
WHERE p.category = 'testimony'
    AND p.created_at >= ?1 AND p.created_at <= ?2
    AND (p.is_deleted = 0 OR p.is_deleted IS NULL)
"#;

pub async fn load_activity_counts(
    pool: &SqlitePool,
    member_id: &str,
    window_start: &str,
    window_end: &str,
) -> sqlx::Result<ActivityCountsRow> {
    sqlx::query_as::<_, ActivityCountsRow>(SQL_LOAD_ACTIVITY_COUNTS)
        .bind(member_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_one(pool)
        .await
}

pub async fn list_qualifying_authors(
    pool: &SqlitePool,
    window_start: &str,
    window_end: &str,
) -> sqlx::Result<Vec<QualifyingAuthorRow>> {
    sqlx::query_as::<_, QualifyingAuthorRow>(SQL_LIST_QUALIFYING_AUTHORS)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(pool)
        .await
}

pub async fn list_window_testimonies(
    pool: &SqlitePool,
    window_start: &str,
    window_end: &str,
) -> sqlx::Result<Vec<TestimonyRow>> {
    sqlx::query_as::<_, TestimonyRow>(SQL_LIST_WINDOW_TESTIMONIES)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(pool)
        .await
}
