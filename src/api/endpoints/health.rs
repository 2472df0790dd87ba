// Status endpoints: `/health` and `/_debug_env`.

use crate::api::state::AppState;
use crate::core::classifier::ProviderKind;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub groq_configured: bool,
    pub database_configured: bool,
    pub hf_token_set: bool,
    pub mock_mode: bool,
    /// Unix seconds with sub-second precision.
    pub time_utc: f64,
}

/// `GET /health` - always 200.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let providers = state.moderation.providers();

    Json(HealthResponse {
        ok: true,
        groq_configured: providers.is_configured(ProviderKind::Groq),
        database_configured: state.moderation.audit().is_configured(),
        hf_token_set: state.credentials.hf_present,
        mock_mode: state.moderation.mock_mode(),
        time_utc: Utc::now().timestamp_millis() as f64 / 1000.0,
    })
}

#[derive(Debug, Serialize)]
pub struct DebugEnvResponse {
    pub database_present: bool,
    pub database_masked: Option<String>,
    pub groq_present: bool,
    pub hf_present: bool,
}

/// `GET /_debug_env` - which credentials were supplied. Never echoes a secret.
pub async fn debug_env(State(state): State<AppState>) -> Json<DebugEnvResponse> {
    let creds = &state.credentials;

    Json(DebugEnvResponse {
        database_present: creds.database_masked.is_some(),
        database_masked: creds.database_masked.clone(),
        groq_present: creds.groq_present,
        hf_present: creds.hf_present,
    })
}
