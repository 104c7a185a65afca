//! Database connection pool and data source selection.

pub mod memory;
pub mod postgres;
pub mod query;
pub mod source;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use memory::MemorySource;
pub use postgres::PgSource;
pub use query::{Filter, Order, Query, Table, Value};
pub use source::{DataSource, Record, Source};

use crate::config::AppConfig;
use crate::errors::AppError;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Open the configured data source. A fixture path takes precedence over the database.
pub async fn connect(config: &AppConfig) -> Result<Source, AppError> {
    if let Some(path) = &config.fixtures_path {
        let memory = MemorySource::load(path)?;
        return Ok(Source::Memory(Arc::new(memory)));
    }

    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Internal("DATABASE_URL is not set".to_string()))?;
    let pool = create_pool(url, config.database_max_connections).await?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "Connected to PostgreSQL"
    );
    Ok(Source::Postgres(PgSource::new(pool)))
}
