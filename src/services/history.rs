//! Per-day execution history for trend charts.

use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{DataSource, Query};
use crate::errors::AppError;
use crate::models::execution::Execution;

pub const DEFAULT_DAYS: i64 = 30;
pub const MAX_DAYS: i64 = 365;

/// Aggregate of one calendar day's executions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub executions: i64,
    pub total_stores: Option<i32>,
    pub synced_count: Option<i32>,
    pub late_count: Option<i32>,
    /// Mean over the executions that reported a percentage.
    pub sync_percentage: Option<f64>,
}

pub fn validate_days(days: i64) -> Result<i64, AppError> {
    if (1..=MAX_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(AppError::Validation(format!(
            "days must be between 1 and {MAX_DAYS}"
        )))
    }
}

/// Executions from the last `days` days, optionally for one client,
/// summarized per local calendar day (newest first).
pub async fn history<S: DataSource>(
    source: &S,
    client_id: Option<i64>,
    days: i64,
) -> Result<Vec<DailySummary>, AppError> {
    let days = validate_days(days)?;
    let since = Utc::now() - Duration::days(days);

    let mut query = Query::new().gte(Execution::EXECUTED_AT, since);
    if let Some(id) = client_id {
        query = query.eq(Execution::CLIENT_ID, id);
    }
    let executions: Vec<Execution> = source
        .fetch(&query.order_desc(Execution::EXECUTED_AT))
        .await?;

    let summaries = summarize(&executions, &Local);
    tracing::debug!(
        client_id = ?client_id,
        days,
        executions = executions.len(),
        buckets = summaries.len(),
        "Built execution history"
    );
    Ok(summaries)
}

#[derive(Default)]
struct Bucket {
    executions: i64,
    total_stores: Option<i32>,
    synced_count: Option<i32>,
    late_count: Option<i32>,
    percentage_sum: f64,
    percentage_count: u32,
}

fn max_opt(current: Option<i32>, next: Option<i32>) -> Option<i32> {
    match (current, next) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Group executions by the calendar date of `executed_at` in `tz`.
/// Executions without a timestamp are skipped.
pub fn summarize<Tz: TimeZone>(executions: &[Execution], tz: &Tz) -> Vec<DailySummary> {
    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();

    for execution in executions {
        let Some(executed_at) = execution.executed_at else {
            continue;
        };
        let date = executed_at.with_timezone(tz).date_naive();
        let bucket = buckets.entry(date).or_default();
        bucket.executions += 1;
        bucket.total_stores = max_opt(bucket.total_stores, execution.total_stores);
        bucket.synced_count = max_opt(bucket.synced_count, execution.synced_count);
        bucket.late_count = max_opt(bucket.late_count, execution.late_count);
        if let Some(pct) = execution.sync_percentage {
            bucket.percentage_sum += pct;
            bucket.percentage_count += 1;
        }
    }

    buckets
        .into_iter()
        .rev()
        .map(|(date, b)| DailySummary {
            date,
            executions: b.executions,
            total_stores: b.total_stores,
            synced_count: b.synced_count,
            late_count: b.late_count,
            sync_percentage: (b.percentage_count > 0)
                .then(|| b.percentage_sum / f64::from(b.percentage_count)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemorySource;
    use chrono::{DateTime, FixedOffset};
    use uuid::Uuid;

    fn execution(
        client_id: i64,
        executed_at: Option<DateTime<Utc>>,
        total: i32,
        synced: i32,
        pct: Option<f64>,
    ) -> Execution {
        Execution {
            id: Uuid::new_v4(),
            client_id: Some(client_id),
            client_name: format!("Client {client_id}"),
            total_stores: Some(total),
            synced_count: Some(synced),
            late_count: Some(total - synced),
            sync_percentage: pct,
            status: Some("success".to_string()),
            error_details: None,
            executed_at,
            origin: Some("local".to_string()),
        }
    }

    fn at(day: u32, hour: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap())
    }

    #[test]
    fn groups_by_local_date_newest_first() {
        let executions = vec![
            execution(1, at(16, 12), 100, 80, Some(80.0)),
            execution(2, at(16, 14), 50, 50, Some(100.0)),
            // 01:00Z on the 16th is the 15th at UTC-3.
            execution(1, at(16, 1), 90, 45, Some(50.0)),
            execution(1, None, 999, 999, Some(0.0)),
        ];
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let summaries = summarize(&executions, &tz);

        assert_eq!(summaries.len(), 2);
        let today = &summaries[0];
        assert_eq!(today.date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(today.executions, 2);
        assert_eq!(today.total_stores, Some(100));
        assert_eq!(today.synced_count, Some(80));
        assert_eq!(today.late_count, Some(20));
        assert_eq!(today.sync_percentage, Some(90.0));

        let yesterday = &summaries[1];
        assert_eq!(yesterday.date, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        assert_eq!(yesterday.executions, 1);
    }

    #[test]
    fn missing_percentages_average_to_none() {
        let summaries = summarize(&[execution(1, at(16, 12), 10, 5, None)], &Utc);
        assert_eq!(summaries[0].sync_percentage, None);
        assert_eq!(summaries[0].total_stores, Some(10));
    }

    #[test]
    fn days_are_validated() {
        assert_eq!(validate_days(30).unwrap(), 30);
        assert!(matches!(validate_days(0), Err(AppError::Validation(_))));
        assert!(validate_days(366).is_err());
    }

    #[tokio::test]
    async fn history_filters_by_client_and_window() {
        let recent = Some(Utc::now() - Duration::hours(1));
        let old = Some(Utc::now() - Duration::days(40));
        let source = MemorySource::new()
            .with_rows(&[
                execution(1, recent, 10, 10, Some(100.0)),
                execution(2, recent, 20, 10, Some(50.0)),
                execution(1, old, 30, 0, Some(0.0)),
            ])
            .unwrap();

        let summaries = history(&source, Some(1), 30).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].executions, 1);
        assert_eq!(summaries[0].total_stores, Some(10));

        let all = history(&source, None, DEFAULT_DAYS).await.unwrap();
        let count: i64 = all.iter().map(|s| s.executions).sum();
        assert_eq!(count, 2);
    }
}
