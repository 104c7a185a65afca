//! Store detail routes.

use axum::{
    extract::{Query, State},
    Json,
};

use super::dashboard::ClientFilter;
use crate::errors::{ApiResponse, AppError};
use crate::services::stores::{self, StoreRow};
use crate::AppState;

/// GET /api/v1/stores: current store rows with delay and status labels.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ClientFilter>,
) -> Result<Json<ApiResponse<Vec<StoreRow>>>, AppError> {
    let rows = stores::list_current(&state.db, filter.client_id).await?;
    Ok(ApiResponse::success(rows))
}
