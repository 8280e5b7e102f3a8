use chrono::Utc;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;

use chosen_connect::services::digest_service;
use chosen_connect::services::engagement_service;

// Invoked by external cron once a week: pick the Member of the Week,
// then send the digest.
#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to DB");

    let limit: usize = env::var("DIGEST_TOP_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);

    let (window_start, window_end) = engagement_service::trailing_week_window(Utc::now());

    match engagement_service::select_and_feature_top_member(&pool, &window_start, &window_end).await
    {
        Ok(outcome) => match outcome.member {
            Some(member) => println!(
                "member of the week: {} (score={}, testimonies={}, likes={})",
                member.name.as_deref().unwrap_or(&member.member_id),
                member.engagement_score,
                member.testimony_count,
                member.total_likes
            ),
            None => println!(
                "member of the week: none ({})",
                outcome.reason.as_deref().unwrap_or("no reason")
            ),
        },
        Err(e) => {
            eprintln!("member-of-the-week selection failed: {}", e);
            std::process::exit(1);
        }
    }

    match digest_service::send_weekly_digest(&pool, &window_start, &window_end, limit).await {
        Ok(report) => {
            println!(
                "weekly digest: recipients={}, sent={}, failed={}",
                report.recipients, report.sent, report.failed
            );
        }
        Err(e) => {
            eprintln!("weekly digest failed: {}", e);
            std::process::exit(1);
        }
    }
}
