//! Every execution logged today.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

use crate::db::{DataSource, Query};
use crate::errors::AppError;
use crate::models::execution_log::{ExecutionLog, LogEntry};

/// UTC bounds of `now`'s calendar day in its own timezone, both inclusive.
pub fn day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let today = now.date_naive();
    let start = local_midnight(&tz, today);
    let end = local_midnight(&tz, today + Duration::days(1)) - Duration::milliseconds(1);
    (start, end)
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        // Midnight skipped by a DST jump; treat the wall clock as UTC.
        .unwrap_or_else(|| midnight.and_utc())
}

/// Logs executed between `start` and `end`, newest first.
pub async fn list_between<S: DataSource>(
    source: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<LogEntry>, AppError> {
    let logs: Vec<ExecutionLog> = source
        .fetch(
            &Query::new()
                .gte(ExecutionLog::EXECUTED_AT, start)
                .lte(ExecutionLog::EXECUTED_AT, end)
                .order_desc(ExecutionLog::EXECUTED_AT),
        )
        .await?;
    Ok(logs.into_iter().map(LogEntry::from).collect())
}

/// Logs executed today in the server's local timezone.
pub async fn list_today<S: DataSource>(source: &S) -> Result<Vec<LogEntry>, AppError> {
    let (start, end) = day_bounds(&Local::now());
    let logs = list_between(source, start, end).await?;
    tracing::debug!(count = logs.len(), %start, %end, "Fetched daily executions");
    Ok(logs)
}
