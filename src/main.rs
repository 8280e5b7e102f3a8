use axum::{
    middleware,
    routing::{get, get_service, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use chosen_connect::web::middleware::auth as auth_middleware;
use chosen_connect::web::routes::{auth, digest, engagement, health, location, members};

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Connect to the database
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
    println!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to DB");

    // 3. Protected routes under one middleware layer
    let protected_routes = Router::new()
        .route("/api/members/nearby", get(members::nearby_members_handler))
        .route(
            "/api/members/me/location",
            post(members::update_location_handler),
        )
        .route("/api/members/:member_id", get(members::member_profile_handler))
        .route(
            "/api/members/:member_id/engagement",
            get(engagement::member_engagement_handler),
        )
        .route(
            "/api/testimonies/top",
            get(engagement::top_testimonies_handler),
        )
        .route(
            "/api/engagement/feature-member",
            post(engagement::feature_member_handler),
        )
        .route("/api/spotlight", get(engagement::spotlight_handler))
        .route("/api/digest/weekly", get(digest::weekly_digest_handler))
        .route("/api/location/geocode", get(location::geocode_handler))
        .route("/logout", post(auth::logout_handler))
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_auth,
        ));

    // 4. Build the whole application
    let app = Router::new()
        // Public routes
        .route("/api/health", get(health::health_handler))
        .route("/api/auth/login", post(auth::login_handler))
        // Protected routes
        .merge(protected_routes)
        // Static files (SPA bundle)
        .nest_service(
            "/assets",
            get_service(ServeDir::new("assets")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        // State
        .with_state(pool);

    // 5. Start the server (with fallback port)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "⚠️  Could not bind on {}: {}. Trying fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Cannot parse fallback");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind on fallback port")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!("🚀 Server running on http://{}", bound_addr);

    axum::serve(listener, app).await.expect("Server crashed");
}
