//! Synchronization run model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Record, Table};

/// One synchronization run for a client. The collector inserts the row when
/// the run starts and fills the counters when it finishes, so most columns
/// are nullable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Execution {
    pub id: Uuid,
    pub client_id: Option<i64>,
    pub client_name: String,
    pub total_stores: Option<i32>,
    pub synced_count: Option<i32>,
    pub late_count: Option<i32>,
    pub sync_percentage: Option<f64>,
    pub status: Option<String>,
    pub error_details: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
    pub origin: Option<String>,
}

impl Execution {
    pub const CLIENT_ID: &'static str = "client_id";
    pub const EXECUTED_AT: &'static str = "executed_at";
}

impl Record for Execution {
    const TABLE: Table = Table::Executions;
}
