use std::env;

use crate::services::dashboard::RECENT_LOG_LIMIT;
use crate::services::history::DEFAULT_DAYS;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string. `None` only when serving from fixtures.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    /// How many execution logs the dashboard shows.
    pub recent_log_limit: i64,
    /// Default window for the execution history endpoint.
    pub history_days: i64,
    /// JSON fixture to serve instead of PostgreSQL.
    pub fixtures_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        let fixtures_path = env::var("FIXTURES_PATH").ok().filter(|p| !p.is_empty());
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => Some(url),
            Err(_) if fixtures_path.is_some() => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            database_url,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            recent_log_limit: env::var("RECENT_LOG_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(RECENT_LOG_LIMIT),
            history_days: env::var("HISTORY_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DAYS),
            fixtures_path,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 10,
            host: "0.0.0.0".to_string(),
            port: 3000,
            frontend_url: "http://localhost:5173".to_string(),
            recent_log_limit: RECENT_LOG_LIMIT,
            history_days: DEFAULT_DAYS,
            fixtures_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_service_constants() {
        let config = AppConfig::default();
        assert_eq!(config.recent_log_limit, RECENT_LOG_LIMIT);
        assert_eq!(config.history_days, DEFAULT_DAYS);
        assert_eq!(config.port, 3000);
        assert!(config.database_url.is_none());
    }
}
