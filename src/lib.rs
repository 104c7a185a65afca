pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use db::Source;
use services::loader::DashboardLoader;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Source,
    pub config: config::AppConfig,
    /// Shared dashboard view behind `/dashboard/current` and `/dashboard/refresh`.
    pub loader: Arc<DashboardLoader<Source>>,
}

impl AppState {
    pub fn new(db: Source, config: config::AppConfig) -> Self {
        let loader = Arc::new(DashboardLoader::new(db.clone(), config.recent_log_limit));
        Self { db, config, loader }
    }
}
