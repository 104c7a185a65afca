//! Per-store synchronization snapshot model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Record, Table};

/// One store's sync status as of a given execution.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct StoreRecord {
    pub id: Uuid,
    pub execution_id: Option<Uuid>,
    pub client_id: Option<i64>,
    pub client_name: String,
    pub store_name: String,
    pub identifier: String,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_synced: bool,
    #[serde(default)]
    pub delay_hours: f64,
    #[serde(default)]
    pub delay_days: i32,
    pub collected_at: Option<DateTime<Utc>>,
}

impl StoreRecord {
    pub const EXECUTION_ID: &'static str = "execution_id";
    pub const CLIENT_ID: &'static str = "client_id";
    pub const COLLECTED_AT: &'static str = "collected_at";
}

impl Record for StoreRecord {
    const TABLE: Table = Table::StoreRecords;
}
