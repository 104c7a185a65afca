use std::net::SocketAddr;

use mimalloc::MiMalloc;
use storesync::config::AppConfig;
use storesync::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: mimalloc as global allocator.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storesync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("DATABASE_URL must be set unless FIXTURES_PATH is provided: {e}"))?;

    let source = storesync::db::connect(&config).await?;
    tracing::info!(source = source.kind(), "Data source ready");

    let host: std::net::IpAddr = config.host.parse()?;
    let addr = SocketAddr::from((host, config.port));
    tracing::info!(host = %addr, "Starting storesync API server");

    let app = storesync::routes::router(AppState::new(source, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
