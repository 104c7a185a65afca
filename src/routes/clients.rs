//! Client routes.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::models::client::Client;
use crate::services::dashboard;
use crate::AppState;

/// GET /api/v1/clients: active clients for the selector.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Client>>>, AppError> {
    let clients = dashboard::fetch_active_clients(&state.db).await?;
    Ok(ApiResponse::success(clients))
}
