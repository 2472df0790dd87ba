use crate::api::state::AppState;
use crate::core::moderation::{ModerationRequest, ModerationResult};
use axum::extract::State;
use axum::Json;

/// `POST /moderate` - classify one text and return the verdict.
pub async fn moderate(
    State(state): State<AppState>,
    Json(request): Json<ModerationRequest>,
) -> Json<ModerationResult> {
    Json(state.moderation.moderate(&request).await)
}
