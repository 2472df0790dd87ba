use crate::core::classifier::ProviderKind;
use crate::core::moderation::{Action, ModerationResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditMeta {
    pub provider: ProviderKind,
}

/// One moderation decision as it is written to the audit collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unix seconds.
    pub timestamp: i64,
    pub raw: String,
    pub action: Action,
    pub score: f64,
    pub reason: String,
    pub matched_seed: Option<String>,
    pub meta: AuditMeta,
}

impl AuditLogEntry {
    pub fn new(
        timestamp: i64,
        raw: &str,
        result: &ModerationResult,
        provider: ProviderKind,
    ) -> Self {
        Self {
            timestamp,
            raw: raw.to_string(),
            action: result.action,
            score: result.score,
            reason: result.reason.clone(),
            matched_seed: result.matched_seed.clone(),
            meta: AuditMeta { provider },
        }
    }
}

/// An entry read back from the store, with its identifier as a display string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredAuditEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub entry: AuditLogEntry,
}
