use crate::core::config::mask_uri;
use crate::core::moderation::ModerationService;
use std::sync::Arc;

/// Which credentials were supplied, independent of whether the clients came up.
#[derive(Debug, Clone, Default)]
pub struct CredentialPresence {
    pub groq_present: bool,
    pub hf_present: bool,
    pub database_masked: Option<String>,
}

impl CredentialPresence {
    pub fn new(groq_present: bool, hf_present: bool, database_uri: Option<&str>) -> Self {
        Self {
            groq_present,
            hf_present,
            database_masked: mask_uri(database_uri, 6),
        }
    }
}

/// Shared handler state. Built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub moderation: Arc<ModerationService>,
    pub credentials: Arc<CredentialPresence>,
}

impl AppState {
    pub fn new(moderation: ModerationService, credentials: CredentialPresence) -> Self {
        Self {
            moderation: Arc::new(moderation),
            credentials: Arc::new(credentials),
        }
    }
}
