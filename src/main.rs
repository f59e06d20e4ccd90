use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use travel_routes::config::{AppConfig, DatabaseConfig};
use travel_routes::database::create_pool;
use travel_routes::routes::create_router;
use travel_routes::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🗺️ Travel routes API");

    let config = AppConfig::from_env()?;
    if config.is_development() {
        info!("🔧 Development mode, CORS origins: {:?}", config.cors_origins);
    }
    let database = DatabaseConfig::from_env()?;
    let pool = create_pool(&database).await?;

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::postgres(pool, config));

    info!("🌐 Listening on http://{}", addr);
    info!("   POST   /routes              create a route");
    info!("   GET    /routes/nearby       routes near lat/lng");
    info!("   GET    /routes/:id          fetch a route");
    info!("   PUT    /routes/:id          replace a route");
    info!("   DELETE /routes/:id          delete a route");
    info!("   GET    /routes/:id/stops    stops of a route");
    info!("   POST   /stops               create a stop");
    info!("   GET    /stops/:id           fetch a stop");
    info!("   PUT    /stops/:id           replace a stop");
    info!("   DELETE /stops/:id           delete a stop");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
