// Audit logger - persists blocked decisions, nothing else.
//
// Writing is fire-and-forget from the caller's point of view: a missing store,
// a non-block action or a failed insert all end the same way (nothing returned).
// Reading is different: the admin endpoint needs to know when there is no store.

use super::audit_models::{AuditLogEntry, StoredAuditEntry};
use crate::core::moderation::Action;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Upper bound on how many entries a single read may return.
pub const MAX_READ_LIMIT: u32 = 1000;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit store is not configured")]
    NotConfigured,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Append-only document collection holding audit entries.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn insert(&self, entry: &AuditLogEntry) -> Result<(), AuditError>;

    /// Newest first, at most `limit` entries.
    async fn recent(&self, limit: u32) -> Result<Vec<StoredAuditEntry>, AuditError>;
}

#[derive(Clone, Default)]
pub struct AuditLogger {
    store: Option<Arc<dyn AuditStore>>,
}

impl AuditLogger {
    pub fn new(store: Option<Arc<dyn AuditStore>>) -> Self {
        Self { store }
    }

    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Persists the entry if it is a block and a store is available.
    pub async fn record(&self, entry: &AuditLogEntry) {
        let Some(store) = &self.store else {
            tracing::debug!("Skipping audit log (no store)");
            return;
        };
        if entry.action != Action::Block {
            tracing::debug!(action = %entry.action, "Skipping audit log (action != block)");
            return;
        }

        match store.insert(entry).await {
            Ok(()) => tracing::debug!("Inserted audit entry"),
            Err(e) => tracing::warn!("Failed to write audit entry: {}", e),
        }
    }

    pub async fn recent(&self, limit: u32) -> Result<Vec<StoredAuditEntry>, AuditError> {
        let store = self.store.as_ref().ok_or(AuditError::NotConfigured)?;
        store.recent(limit.min(MAX_READ_LIMIT)).await
    }
}
