//! The read-only data source seam shared by PostgreSQL and the in-memory store.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;

use super::memory::MemorySource;
use super::postgres::PgSource;
use super::query::{Query, Table};
use crate::errors::AppError;

/// A row type that lives in one of the dashboard tables.
pub trait Record:
    Serialize + DeserializeOwned + for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin + 'static
{
    const TABLE: Table;
}

/// Executes table-scoped read queries.
pub trait DataSource: Send + Sync {
    fn fetch<R: Record>(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<R>, AppError>> + Send;

    /// Cheap connectivity check for readiness probes.
    fn ping(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}

impl<S: DataSource> DataSource for Arc<S> {
    async fn fetch<R: Record>(&self, query: &Query) -> Result<Vec<R>, AppError> {
        self.as_ref().fetch(query).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.as_ref().ping().await
    }
}

/// The data source selected at startup.
#[derive(Debug, Clone)]
pub enum Source {
    Postgres(PgSource),
    Memory(Arc<MemorySource>),
}

impl Source {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl DataSource for Source {
    async fn fetch<R: Record>(&self, query: &Query) -> Result<Vec<R>, AppError> {
        match self {
            Self::Postgres(pg) => pg.fetch(query).await,
            Self::Memory(mem) => mem.fetch(query).await,
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        match self {
            Self::Postgres(pg) => pg.ping().await,
            Self::Memory(mem) => mem.ping().await,
        }
    }
}
