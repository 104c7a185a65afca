//! Dashboard aggregation: clients, recent logs, the current store snapshot
//! and the statistics derived from them.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{DataSource, Query};
use crate::errors::AppError;
use crate::models::client::Client;
use crate::models::execution::Execution;
use crate::models::execution_log::{ExecutionLog, LogEntry, LogStatus};
use crate::models::store_record::StoreRecord;

/// Default number of execution logs shown on the dashboard.
pub const RECENT_LOG_LIMIT: i64 = 3;

/// Aggregated statistics for the overview cards and chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_stores: i64,
    pub synced_count: i64,
    pub late_count: i64,
    pub sync_percentage: f64,
    /// `None` only before the first successful load.
    pub last_execution: Option<DateTime<Utc>>,
    pub total_clients: i64,
    pub executions_today: i64,
    pub success_count: i64,
    pub error_count: i64,
}

/// Raw rows gathered by one load cycle.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub clients: Vec<Client>,
    pub logs: Vec<ExecutionLog>,
    pub store_records: Vec<StoreRecord>,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub clients: Vec<Client>,
    pub logs: Vec<LogEntry>,
    pub store_records: Vec<StoreRecord>,
}

impl DashboardSnapshot {
    pub fn new(data: DashboardData, stats: DashboardStats) -> Self {
        Self {
            stats,
            clients: data.clients,
            logs: data.logs.into_iter().map(LogEntry::from).collect(),
            store_records: data.store_records,
        }
    }
}

/// Run one load cycle and derive statistics against the local clock.
pub async fn load_dashboard<S: DataSource>(
    source: &S,
    client_id: Option<i64>,
    log_limit: i64,
) -> Result<DashboardSnapshot, AppError> {
    let data = fetch_dashboard(source, client_id, log_limit)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, client_id = ?client_id, "Dashboard load failed");
            e
        })?;

    let stats = derive_stats(&data, client_id.is_some(), &Local::now());
    tracing::debug!(
        client_id = ?client_id,
        stores = stats.total_stores,
        logs = data.logs.len(),
        "Dashboard loaded"
    );
    Ok(DashboardSnapshot::new(data, stats))
}

/// Fetch clients, recent logs and the current store snapshot.
///
/// The queries run in sequence: logs need the selected client's name and
/// store records need the resolved execution ids.
pub async fn fetch_dashboard<S: DataSource>(
    source: &S,
    client_id: Option<i64>,
    log_limit: i64,
) -> Result<DashboardData, AppError> {
    let clients = fetch_active_clients(source).await?;
    let selected = resolve_client(&clients, client_id);

    let mut log_query = Query::new();
    if let Some(client) = selected {
        // Logs carry no client id.
        log_query = log_query.eq(ExecutionLog::CLIENT_NAME, client.name.as_str());
    }
    let logs: Vec<ExecutionLog> = source
        .fetch(
            &log_query
                .order_desc(ExecutionLog::EXECUTED_AT)
                .limit(log_limit),
        )
        .await?;

    let store_records = fetch_current_records(source, &clients, selected).await?;

    Ok(DashboardData {
        clients,
        logs,
        store_records,
    })
}

pub async fn fetch_active_clients<S: DataSource>(source: &S) -> Result<Vec<Client>, AppError> {
    source
        .fetch(
            &Query::new()
                .eq(Client::ACTIVE, true)
                .order_asc(Client::NAME),
        )
        .await
}

/// Find the selected client among the active ones. An id that matches no
/// active client selects nothing, so the load stays unfiltered.
pub fn resolve_client(clients: &[Client], client_id: Option<i64>) -> Option<&Client> {
    let id = client_id?;
    let found = clients.iter().find(|c| c.id == id);
    if found.is_none() {
        tracing::warn!(client_id = id, "Selected client is not active, showing all clients");
    }
    found
}

/// Store records attached to the latest execution of the selected client,
/// or to the most recent executions overall when no client is selected.
pub async fn fetch_current_records<S: DataSource>(
    source: &S,
    clients: &[Client],
    selected: Option<&Client>,
) -> Result<Vec<StoreRecord>, AppError> {
    let record_query = match selected {
        Some(client) => {
            let latest: Vec<Execution> = source
                .fetch(
                    &Query::new()
                        .eq(Execution::CLIENT_ID, client.id)
                        .order_desc(Execution::EXECUTED_AT)
                        .limit(1),
                )
                .await?;

            match latest.first() {
                Some(execution) => Query::new().eq(StoreRecord::EXECUTION_ID, execution.id),
                // No execution row yet: fall back to whatever the client has.
                None => Query::new().eq(StoreRecord::CLIENT_ID, client.id),
            }
        }
        None => {
            // One slot per client; assumes each client ran at most once in
            // the window covered by the newest executions.
            let slots = i64::try_from(clients.len()).unwrap_or(i64::MAX).max(1);
            let latest: Vec<Execution> = source
                .fetch(
                    &Query::new()
                        .order_desc(Execution::EXECUTED_AT)
                        .limit(slots),
                )
                .await?;

            if latest.is_empty() {
                return Ok(Vec::new());
            }
            let ids: Vec<Uuid> = latest.iter().map(|e| e.id).collect();
            Query::new().is_in(StoreRecord::EXECUTION_ID, ids)
        }
    };

    source
        .fetch(&record_query.order_desc(StoreRecord::COLLECTED_AT))
        .await
}

/// Derive dashboard statistics. `now` fixes both "today" and the fallback
/// last-execution time.
pub fn derive_stats<Tz: TimeZone>(
    data: &DashboardData,
    client_selected: bool,
    now: &DateTime<Tz>,
) -> DashboardStats {
    let total_stores = data.store_records.len() as i64;
    let synced_count = data.store_records.iter().filter(|r| r.is_synced).count() as i64;
    let late_count = total_stores - synced_count;
    let sync_percentage = if total_stores > 0 {
        synced_count as f64 / total_stores as f64 * 100.0
    } else {
        0.0
    };

    let count_status =
        |status: LogStatus| data.logs.iter().filter(|l| l.status == status).count() as i64;

    let tz = now.timezone();
    let today = now.date_naive();
    let executions_today = data
        .logs
        .iter()
        .filter(|l| l.executed_at.with_timezone(&tz).date_naive() == today)
        .count() as i64;

    let last_execution = data
        .logs
        .first()
        .map(|l| l.executed_at)
        .unwrap_or_else(|| now.with_timezone(&Utc));

    let total_clients = if client_selected {
        1
    } else {
        data.clients.len() as i64
    };

    DashboardStats {
        total_stores,
        synced_count,
        late_count,
        sync_percentage,
        last_execution: Some(last_execution),
        total_clients,
        executions_today,
        success_count: count_status(LogStatus::Success),
        error_count: count_status(LogStatus::Error),
    }
}
