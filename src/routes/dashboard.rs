//! Dashboard routes: the aggregated overview and the shared loader view.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::services::dashboard::{self, DashboardSnapshot};
use crate::services::loader::DashboardView;
use crate::AppState;

/// Optional client filter shared by dashboard-style endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    pub client_id: Option<i64>,
}

/// GET /api/v1/dashboard: stats, clients, recent logs and store snapshot.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(filter): Query<ClientFilter>,
) -> Result<Json<ApiResponse<DashboardSnapshot>>, AppError> {
    let snapshot =
        dashboard::load_dashboard(&state.db, filter.client_id, state.config.recent_log_limit)
            .await?;
    Ok(ApiResponse::success(snapshot))
}

/// GET /api/v1/dashboard/current: last committed view of the shared loader.
pub async fn current(State(state): State<AppState>) -> Json<ApiResponse<DashboardView>> {
    ApiResponse::success(state.loader.state().await)
}

/// POST /api/v1/dashboard/refresh: reload the shared view.
pub async fn refresh(
    State(state): State<AppState>,
    Query(filter): Query<ClientFilter>,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    let view = state.loader.load(filter.client_id).await?;
    Ok(ApiResponse::success(view))
}
