use std::net::SocketAddr;
use std::path::Path;

use axum::http::Method;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskboard_api::DbState;

mod config;
mod health;
mod middleware;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = DbState::init().await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // The browser client lives next to the binary's sources
    let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");

    let app = taskboard_api::create_router(db)
        .route("/api/health", get(health::health_check))
        .fallback_service(ServeDir::new(static_dir))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
