//! Execution audit log model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{Record, Table};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "log_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Success,
    Error,
    NoData,
}

impl LogStatus {
    /// Human label for badges and lists.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::NoData => "No data",
        }
    }
}

/// Raw `execution_logs` row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ExecutionLog {
    pub id: i64,
    pub client_name: String,
    pub status: LogStatus,
    pub details: Option<String>,
    pub total_stores: Option<i32>,
    pub executed_at: DateTime<Utc>,
    pub origin: Option<String>,
}

impl ExecutionLog {
    pub const CLIENT_NAME: &'static str = "client_name";
    pub const EXECUTED_AT: &'static str = "executed_at";
}

impl Record for ExecutionLog {
    const TABLE: Table = Table::ExecutionLogs;
}

/// Log entry as returned by the API, with storage nulls filled in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub client_name: String,
    pub status: LogStatus,
    pub status_label: String,
    pub details: Option<String>,
    pub total_stores: i32,
    pub executed_at: DateTime<Utc>,
    pub origin: String,
}

impl LogEntry {
    pub const DEFAULT_ORIGIN: &'static str = "local";
}

impl From<ExecutionLog> for LogEntry {
    fn from(log: ExecutionLog) -> Self {
        Self {
            id: log.id.to_string(),
            client_name: log.client_name,
            status: log.status,
            status_label: log.status.label().to_string(),
            details: log.details,
            total_stores: log.total_stores.unwrap_or(0),
            executed_at: log.executed_at,
            origin: log
                .origin
                .unwrap_or_else(|| Self::DEFAULT_ORIGIN.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(LogStatus::NoData).unwrap(),
            serde_json::json!("no_data")
        );
        let parsed: LogStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(parsed, LogStatus::Error);
    }

    #[test]
    fn entry_fills_storage_nulls() {
        let log = ExecutionLog {
            id: 42,
            client_name: "Client A".to_string(),
            status: LogStatus::NoData,
            details: None,
            total_stores: None,
            executed_at: Utc::now(),
            origin: None,
        };
        let entry = LogEntry::from(log);
        assert_eq!(entry.id, "42");
        assert_eq!(entry.total_stores, 0);
        assert_eq!(entry.origin, "local");
        assert_eq!(entry.status_label, "No data");
    }
}
