//! Store detail table: the current snapshot shaped for display.

use serde::Serialize;

use super::dashboard;
use super::delay::{format_delay, sync_label};
use crate::db::DataSource;
use crate::errors::AppError;
use crate::models::store_record::StoreRecord;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoreRow {
    #[serde(flatten)]
    pub record: StoreRecord,
    pub delay_label: String,
    pub status_label: &'static str,
}

impl From<StoreRecord> for StoreRow {
    fn from(record: StoreRecord) -> Self {
        Self {
            delay_label: format_delay(record.delay_hours, record.delay_days),
            status_label: sync_label(record.is_synced),
            record,
        }
    }
}

/// Current store rows for one client, or for every active client.
pub async fn list_current<S: DataSource>(
    source: &S,
    client_id: Option<i64>,
) -> Result<Vec<StoreRow>, AppError> {
    let clients = dashboard::fetch_active_clients(source).await?;
    let selected = dashboard::resolve_client(&clients, client_id);
    let records = dashboard::fetch_current_records(source, &clients, selected).await?;
    Ok(records.into_iter().map(StoreRow::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(is_synced: bool, delay_hours: f64, delay_days: i32) -> StoreRecord {
        StoreRecord {
            id: Uuid::new_v4(),
            execution_id: None,
            client_id: Some(1),
            client_name: "Client A".to_string(),
            store_name: "Downtown".to_string(),
            identifier: "DT-01".to_string(),
            updated_at: None,
            is_synced,
            delay_hours,
            delay_days,
            collected_at: None,
        }
    }

    #[test]
    fn synced_row_labels() {
        let row = StoreRow::from(record(true, 0.0, 0));
        assert_eq!(row.delay_label, "Updated");
        assert_eq!(row.status_label, "Synced");
    }

    #[test]
    fn late_row_labels() {
        let row = StoreRow::from(record(false, 50.0, 2));
        assert_eq!(row.delay_label, "2 days");
        assert_eq!(row.status_label, "Late");
    }

    #[test]
    fn row_serializes_flat() {
        let row = StoreRow::from(record(false, 1.5, 0));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["store_name"], "Downtown");
        assert_eq!(json["delay_label"], "1 hour and 30 minutes");
        assert_eq!(json["status_label"], "Late");
    }
}
