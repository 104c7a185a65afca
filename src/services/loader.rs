//! Stateful dashboard loader.
//!
//! Keeps the last good snapshot plus loading/error flags for one view.
//! Every load takes a generation number; only the newest generation may
//! commit, so a slow superseded load can never overwrite fresher data.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;

use super::dashboard::{self, DashboardSnapshot};
use crate::db::DataSource;
use crate::errors::AppError;

/// What a view renders: the last committed snapshot and load status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
    /// Client filter of the committed snapshot.
    pub client_id: Option<i64>,
    pub loading: bool,
    pub last_error: Option<String>,
    /// Generation of the committed snapshot; 0 before the first load.
    pub generation: u64,
}

#[derive(Debug)]
pub struct DashboardLoader<S> {
    source: S,
    log_limit: i64,
    /// Newest generation started.
    generation: AtomicU64,
    /// Newest generation that finished or was dropped.
    settled: AtomicU64,
    view: RwLock<DashboardView>,
}

/// Marks a generation settled when its load finishes or its future is dropped.
struct Settle<'a> {
    settled: &'a AtomicU64,
    generation: u64,
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        self.settled.fetch_max(self.generation, Ordering::SeqCst);
    }
}

impl<S: DataSource> DashboardLoader<S> {
    pub fn new(source: S, log_limit: i64) -> Self {
        Self {
            source,
            log_limit,
            generation: AtomicU64::new(0),
            settled: AtomicU64::new(0),
            view: RwLock::new(DashboardView::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current view.
    pub async fn state(&self) -> DashboardView {
        let view = self.view.read().await;
        self.render(&view)
    }

    /// Load the dashboard for `client_id` (or all clients).
    ///
    /// Returns the view after this load. A superseded load commits nothing
    /// and returns whatever is current. Dropping the future before it
    /// completes leaves the committed view untouched.
    pub async fn load(&self, client_id: Option<i64>) -> Result<DashboardView, AppError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let settle = Settle {
            settled: &self.settled,
            generation,
        };

        let result = dashboard::load_dashboard(&self.source, client_id, self.log_limit).await;

        let mut view = self.view.write().await;
        let outcome = if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(
                generation,
                client_id = ?client_id,
                "Discarding superseded dashboard load"
            );
            result.map(|_| ())
        } else {
            match result {
                Ok(snapshot) => {
                    view.snapshot = snapshot;
                    view.client_id = client_id;
                    view.last_error = None;
                    view.generation = generation;
                    Ok(())
                }
                Err(e) => {
                    view.last_error = Some(e.to_string());
                    Err(e)
                }
            }
        };

        drop(settle);
        outcome.map(|()| self.render(&view))
    }

    /// A load is in flight while the newest started generation is unsettled.
    fn is_loading(&self) -> bool {
        self.settled.load(Ordering::SeqCst) < self.generation.load(Ordering::SeqCst)
    }

    fn render(&self, view: &DashboardView) -> DashboardView {
        DashboardView {
            loading: self.is_loading(),
            ..view.clone()
        }
    }
}
