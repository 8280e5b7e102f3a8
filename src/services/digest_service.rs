use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::{featured_member_repo, member_repo};
use crate::models::{SpotlightRow, TestimonyRow};
use crate::services::engagement_service;
use crate::services::notify_service;

#[derive(Debug, Serialize)]
pub struct WeeklyDigestView {
    pub window_start: String,
    pub window_end: String,
    pub spotlight: Option<SpotlightRow>,
    pub top_testimonies: Vec<TestimonyRow>,
}

pub async fn build_weekly_digest(
    pool: &SqlitePool,
    window_start: &str,
    window_end: &str,
    limit: usize,
) -> sqlx::Result<WeeklyDigestView> {
    let spotlight = featured_member_repo::load_spotlight(pool).await?;
    let top_testimonies =
        engagement_service::top_testimonies_for_window(pool, window_start, window_end, limit)
            .await?;

    Ok(WeeklyDigestView {
        window_start: window_start.to_string(),
        window_end: window_end.to_string(),
        spotlight,
        top_testimonies,
    })
}

#[derive(Debug, Default)]
pub struct DigestSendReport {
    pub recipients: usize,
    pub sent: usize,
    pub failed: usize,
}

/// One email per opted-in member, sent directly in sequence. A recipient
/// that fails is counted and logged; the loop keeps going.
pub async fn send_weekly_digest(
    pool: &SqlitePool,
    window_start: &str,
    window_end: &str,
    limit: usize,
) -> sqlx::Result<DigestSendReport> {
    let digest = build_weekly_digest(pool, window_start, window_end, limit).await?;
    let recipients = member_repo::list_digest_recipients(pool).await?;

    let mut report = DigestSendReport {
        recipients: recipients.len(),
        ..Default::default()
    };

    let subject = digest_subject(&digest);
    for recipient in recipients {
        let html = render_digest_html(&digest, recipient.name.as_deref());
        match notify_service::send_email(&recipient.email, &subject, &html).await {
            Ok(_) => report.sent += 1,
            Err(e) => {
                warn!("📬 Digest send to {} failed: {}", recipient.member_id, e);
                report.failed += 1;
            }
        }
    }

    info!(
        "📬 Weekly digest done: recipients={}, sent={}, failed={}",
        report.recipients, report.sent, report.failed
    );

    Ok(report)
}

fn digest_subject(digest: &WeeklyDigestView) -> String {
    match &digest.spotlight {
        Some(spotlight) => match spotlight.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                format!("This week at Chosen Connect — featuring {}", name)
            }
            _ => "This week at Chosen Connect".to_string(),
        },
        None => "This week at Chosen Connect".to_string(),
    }
}

fn render_digest_html(digest: &WeeklyDigestView, recipient_name: Option<&str>) -> String {
    let mut html = String::new();
    let greeting = recipient_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("friend");
    html.push_str(&format!("<p>Hi {},</p>", greeting));

    if let Some(spotlight) = &digest.spotlight {
        html.push_str(&format!(
            "<p>Member of the Week: <strong>{}</strong></p>",
            spotlight.name.as_deref().unwrap_or("a member")
        ));
    }

    if digest.top_testimonies.is_empty() {
        html.push_str("<p>No new testimonies this week.</p>");
    } else {
        html.push_str("<p>Top testimonies this week:</p><ol>");
        for testimony in &digest.top_testimonies {
            html.push_str(&format!(
                "<li>{} — {} likes, {} comments</li>",
                testimony.title.as_deref().unwrap_or("(untitled)"),
                testimony.likes_count,
                testimony.comments_count
            ));
        }
        html.push_str("</ol>");
    }

    html
}
