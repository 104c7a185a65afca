//! PostgreSQL-backed data source.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::query::{Filter, Query, Table, Value};
use super::source::{DataSource, Record};
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct PgSource {
    pool: PgPool,
}

impl PgSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DataSource for PgSource {
    async fn fetch<R: Record>(&self, query: &Query) -> Result<Vec<R>, AppError> {
        let mut builder = render(R::TABLE, query);
        tracing::debug!(table = R::TABLE.as_str(), sql = builder.sql(), "Running query");
        let rows = builder.build_query_as::<R>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Binds a filter value on either a QueryBuilder or a Separated.
macro_rules! bind_value {
    ($target:expr, $value:expr) => {
        match $value {
            Value::Bool(v) => {
                $target.push_bind(*v);
            }
            Value::Int(v) => {
                $target.push_bind(*v);
            }
            Value::Text(v) => {
                $target.push_bind(v.clone());
            }
            Value::Uuid(v) => {
                $target.push_bind(*v);
            }
            Value::Timestamp(v) => {
                $target.push_bind(*v);
            }
        }
    };
}

/// Render a query to parameterized SQL.
pub fn render(table: Table, query: &Query) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT * FROM {}", table.as_str()));

    for (i, filter) in query.filters().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        match filter {
            Filter::Eq(column, value) => {
                builder.push(*column).push(" = ");
                bind_value!(builder, value);
            }
            Filter::Gte(column, value) => {
                builder.push(*column).push(" >= ");
                bind_value!(builder, value);
            }
            Filter::Lte(column, value) => {
                builder.push(*column).push(" <= ");
                bind_value!(builder, value);
            }
            Filter::In(_, values) if values.is_empty() => {
                builder.push("FALSE");
            }
            Filter::In(column, values) => {
                builder.push(*column).push(" IN (");
                let mut separated = builder.separated(", ");
                for value in values {
                    bind_value!(separated, value);
                }
                separated.push_unseparated(")");
            }
        }
    }

    if let Some(order) = query.order() {
        builder
            .push(" ORDER BY ")
            .push(order.column)
            .push(if order.descending {
                " DESC NULLS LAST"
            } else {
                " ASC NULLS LAST"
            });
    }

    if let Some(limit) = query.row_limit() {
        builder.push(" LIMIT ").push_bind(limit);
    }

    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn renders_bare_select() {
        let builder = render(Table::Clients, &Query::new());
        assert_eq!(builder.sql(), "SELECT * FROM clients");
    }

    #[test]
    fn renders_recent_logs_query() {
        let query = Query::new()
            .eq("client_name", "Client A")
            .order_desc("executed_at")
            .limit(3);
        let builder = render(Table::ExecutionLogs, &query);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM execution_logs WHERE client_name = $1 \
             ORDER BY executed_at DESC NULLS LAST LIMIT $2"
        );
    }

    #[test]
    fn renders_in_list_with_one_placeholder_per_value() {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let query = Query::new()
            .is_in("execution_id", ids)
            .order_desc("collected_at");
        let builder = render(Table::StoreRecords, &query);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM store_records WHERE execution_id IN ($1, $2) \
             ORDER BY collected_at DESC NULLS LAST"
        );
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let query = Query::new().is_in("execution_id", Vec::<Uuid>::new());
        let builder = render(Table::StoreRecords, &query);
        assert_eq!(builder.sql(), "SELECT * FROM store_records WHERE FALSE");
    }

    #[test]
    fn renders_range_filters() {
        let now = chrono::Utc::now();
        let query = Query::new()
            .gte("executed_at", now)
            .lte("executed_at", now)
            .order_asc("executed_at");
        let builder = render(Table::ExecutionLogs, &query);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM execution_logs WHERE executed_at >= $1 AND executed_at <= $2 \
             ORDER BY executed_at ASC NULLS LAST"
        );
    }
}
