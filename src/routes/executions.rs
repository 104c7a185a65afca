//! Execution routes: today's runs and per-day history.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::models::execution_log::LogEntry;
use crate::services::daily;
use crate::services::history::{self as history_service, DailySummary};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub client_id: Option<i64>,
    pub days: Option<i64>,
}

/// GET /api/v1/executions/today: every execution logged today.
pub async fn today(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LogEntry>>>, AppError> {
    let logs = daily::list_today(&state.db).await?;
    Ok(ApiResponse::success(logs))
}

/// GET /api/v1/executions/history: per-day execution aggregates.
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<Vec<DailySummary>>>, AppError> {
    let days = params.days.unwrap_or(state.config.history_days);
    let summaries = history_service::history(&state.db, params.client_id, days).await?;
    Ok(ApiResponse::success(summaries))
}
