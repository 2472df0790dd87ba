use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::core::audit::StoredAuditEntry;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub n: usize,
    pub results: Vec<StoredAuditEntry>,
}

/// `GET /admin/logs?limit=N` - most recent blocked entries, newest first.
pub async fn logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let results = state.moderation.recent_blocks(limit).await?;

    Ok(Json(LogsResponse {
        n: results.len(),
        results,
    }))
}
