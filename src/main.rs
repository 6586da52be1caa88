use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use nighthub::{admin, store, ws, AppState, Config, Hub};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nighthub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await?;
    store::init_schema(&db_pool).await?;

    let hub = Hub::new(config.match_policy, store::spawn(db_pool.clone()));

    let stats_hub = Arc::clone(&hub);
    let stats_interval = Duration::from_secs(config.stats_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(stats_interval);
        loop {
            ticker.tick().await;
            stats_hub.broadcast_stats();
        }
    });

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState { db_pool, hub, config };
    let app = Router::new()
        .route("/healthz", get(admin::healthz))
        .route("/ws", get(ws::chat_ws))
        .nest("/api", admin::router())
        .with_state(app_state)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
