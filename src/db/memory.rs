//! In-memory data source over JSON rows.
//!
//! Serves fixture files (`FIXTURES_PATH`) and tests. Filters follow SQL
//! semantics: a missing or null column never matches, and null sort keys
//! sort last in both directions.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value as Json;
use uuid::Uuid;

use super::query::{Filter, Query, Table, Value};
use super::source::{DataSource, Record};
use crate::errors::AppError;

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<Table, Vec<Json>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object keyed by table name, e.g.
    /// `{"clients": [...], "executions": [...]}`. Missing tables are empty.
    pub fn from_json(document: Json) -> Result<Self, AppError> {
        let Json::Object(map) = document else {
            return Err(AppError::Fixture(
                "fixture document must be a JSON object".to_string(),
            ));
        };

        let mut tables = HashMap::new();
        for (name, rows) in map {
            let table = Table::from_name(&name)
                .ok_or_else(|| AppError::Fixture(format!("unknown table '{name}'")))?;
            let Json::Array(rows) = rows else {
                return Err(AppError::Fixture(format!(
                    "table '{name}' must be a JSON array"
                )));
            };
            tables.insert(table, rows);
        }

        Ok(Self { tables })
    }

    /// Load a fixture file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Fixture(format!("failed to read {}: {e}", path.display()))
        })?;
        let source = Self::from_json(serde_json::from_str(&contents)?)?;
        tracing::info!(
            path = %path.display(),
            rows = source.len(),
            "Loaded fixture data"
        );
        Ok(source)
    }

    /// Append a typed row to its table.
    pub fn insert<R: Record>(&mut self, row: &R) -> Result<(), AppError> {
        let value = serde_json::to_value(row)?;
        self.tables.entry(R::TABLE).or_default().push(value);
        Ok(())
    }

    pub fn with_rows<R: Record>(mut self, rows: &[R]) -> Result<Self, AppError> {
        for row in rows {
            self.insert(row)?;
        }
        Ok(self)
    }

    /// Total row count across all tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(&self, table: Table, query: &Query) -> Vec<&Json> {
        let Some(rows) = self.tables.get(&table) else {
            return Vec::new();
        };

        let mut selected: Vec<&Json> = rows
            .iter()
            .filter(|row| query.filters().iter().all(|f| matches(row, f)))
            .collect();

        if let Some(order) = query.order() {
            selected.sort_by(|a, b| {
                compare_keys(a.get(order.column), b.get(order.column), order.descending)
            });
        }

        if let Some(limit) = query.row_limit() {
            selected.truncate(usize::try_from(limit).unwrap_or(0));
        }

        selected
    }
}

impl DataSource for MemorySource {
    async fn fetch<R: Record>(&self, query: &Query) -> Result<Vec<R>, AppError> {
        self.select(R::TABLE, query)
            .into_iter()
            .map(|row| serde_json::from_value::<R>(row.clone()).map_err(AppError::from))
            .collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

fn matches(row: &Json, filter: &Filter) -> bool {
    let cell = row.get(filter.column());
    let cmp = |value: &Value| cell.and_then(|c| compare_cell(c, value));
    match filter {
        Filter::Eq(_, value) => cmp(value) == Some(Ordering::Equal),
        Filter::In(_, values) => values.iter().any(|v| cmp(v) == Some(Ordering::Equal)),
        Filter::Gte(_, value) => matches!(cmp(value), Some(Ordering::Greater | Ordering::Equal)),
        Filter::Lte(_, value) => matches!(cmp(value), Some(Ordering::Less | Ordering::Equal)),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

/// Compare a stored cell against a filter value. `None` when the types don't line up.
fn compare_cell(cell: &Json, value: &Value) -> Option<Ordering> {
    match (cell, value) {
        (Json::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Json::Number(a), Value::Int(b)) => a.as_i64().map(|a| a.cmp(b)),
        (Json::String(a), Value::Text(b)) => Some(a.as_str().cmp(b.as_str())),
        (Json::String(a), Value::Uuid(b)) => Uuid::parse_str(a).ok().map(|a| a.cmp(b)),
        (Json::String(a), Value::Timestamp(b)) => {
            parse_timestamp(a).map(|a| a.with_timezone(&Utc).cmp(b))
        }
        _ => None,
    }
}

fn compare_keys(a: Option<&Json>, b: Option<&Json>, descending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ord = compare_values(a, b);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

fn compare_values(a: &Json, b: &Json) -> Ordering {
    match (a, b) {
        (Json::Number(a), Json::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Json::String(a), Json::String(b)) => match (parse_timestamp(a), parse_timestamp(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
        (Json::Bool(a), Json::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
