//! Table-scoped read queries: filter, order and limit.
//!
//! A [`Query`] is backend-agnostic. [`super::postgres`] renders it to SQL and
//! [`super::memory`] evaluates it against JSON rows. Column names are
//! `&'static str` constants declared on the models, never user input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four tables the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Clients,
    Executions,
    ExecutionLogs,
    StoreRecords,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Clients,
        Table::Executions,
        Table::ExecutionLogs,
        Table::StoreRecords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Executions => "executions",
            Self::ExecutionLogs => "execution_logs",
            Self::StoreRecords => "store_records",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// A bound filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, Value),
    /// Matches nothing when the list is empty.
    In(&'static str, Vec<Value>),
    Gte(&'static str, Value),
    Lte(&'static str, Value),
}

impl Filter {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Eq(c, _) | Self::In(c, _) | Self::Gte(c, _) | Self::Lte(c, _) => c,
        }
    }
}

/// Sort order. Rows with a null sort key always come last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub descending: bool,
}

/// A `SELECT *` over one table with optional filters, order and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<Filter>,
    order: Option<Order>,
    limit: Option<i64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column, value.into()));
        self
    }

    pub fn is_in<V: Into<Value>>(
        mut self,
        column: &'static str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.filters.push(Filter::In(
            column,
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn gte(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte(column, value.into()));
        self
    }

    pub fn lte(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lte(column, value.into()));
        self
    }

    pub fn order_desc(mut self, column: &'static str) -> Self {
        self.order = Some(Order {
            column,
            descending: true,
        });
        self
    }

    pub fn order_asc(mut self, column: &'static str) -> Self {
        self.order = Some(Order {
            column,
            descending: false,
        });
        self
    }

    /// Negative limits are clamped to zero.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit.max(0));
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order(&self) -> Option<Order> {
        self.order
    }

    pub fn row_limit(&self) -> Option<i64> {
        self.limit
    }

    /// The value of the first equality filter on `column`, if any.
    pub fn eq_value(&self, column: &str) -> Option<&Value> {
        self.filters.iter().find_map(|f| match f {
            Filter::Eq(c, v) if *c == column => Some(v),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_round_trip() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.as_str()), Some(table));
        }
        assert_eq!(Table::from_name("lojas"), None);
    }

    #[test]
    fn builder_collects_filters_in_order() {
        let q = Query::new()
            .eq("client_name", "Client A")
            .is_in("execution_id", Vec::<Uuid>::new())
            .order_desc("executed_at")
            .limit(3);

        assert_eq!(q.filters().len(), 2);
        assert_eq!(q.filters()[0].column(), "client_name");
        assert_eq!(q.filters()[1], Filter::In("execution_id", vec![]));
        assert_eq!(
            q.order(),
            Some(Order {
                column: "executed_at",
                descending: true
            })
        );
        assert_eq!(q.row_limit(), Some(3));
    }

    #[test]
    fn negative_limit_clamps_to_zero() {
        assert_eq!(Query::new().limit(-5).row_limit(), Some(0));
    }

    #[test]
    fn eq_value_finds_first_match() {
        let q = Query::new().eq("client_id", 7i64).eq("active", true);
        assert_eq!(q.eq_value("client_id"), Some(&Value::Int(7)));
        assert_eq!(q.eq_value("active"), Some(&Value::Bool(true)));
        assert_eq!(q.eq_value("name"), None);
    }
}
