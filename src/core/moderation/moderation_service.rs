// Moderation service - the decision pipeline.
//
// This service handles:
// - Input normalization (empty text short-circuits)
// - Mock mode (no outbound calls at all)
// - Classification through the provider chain
// - Mapping the score to an action
// - Handing blocked decisions to the audit logger
//
// NO HTTP dependencies here - the handlers call `moderate` and serialize the result.

use super::moderation_models::{ModerationRequest, ModerationResult};
use super::moderation_policy::DecisionPolicy;
use crate::core::audit::{AuditError, AuditLogEntry, AuditLogger, StoredAuditEntry};
use crate::core::classifier::{build_prompt, ProviderChain};
use chrono::Utc;

pub struct ModerationService {
    providers: ProviderChain,
    policy: DecisionPolicy,
    audit: AuditLogger,
    mock_mode: bool,
}

impl ModerationService {
    pub fn new(
        providers: ProviderChain,
        policy: DecisionPolicy,
        audit: AuditLogger,
        mock_mode: bool,
    ) -> Self {
        Self {
            providers,
            policy,
            audit,
            mock_mode,
        }
    }

    pub fn providers(&self) -> &ProviderChain {
        &self.providers
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn mock_mode(&self) -> bool {
        self.mock_mode
    }

    /// Runs the full pipeline. Always produces a verdict; provider and
    /// persistence failures degrade instead of erroring.
    pub async fn moderate(&self, request: &ModerationRequest) -> ModerationResult {
        let text = request.text.trim();
        if text.is_empty() {
            return ModerationResult::empty_text();
        }

        if self.mock_mode {
            return ModerationResult::mock();
        }

        let prompt = build_prompt(text);
        let classification = self.providers.classify(&prompt).await;
        let verdict = classification.verdict;

        let result = ModerationResult {
            action: self.policy.decide(verdict.score),
            score: verdict.score,
            reason: verdict.reason(),
            matched_seed: verdict.matched_seed,
        };

        tracing::info!(
            mode = %request.mode,
            provider = %classification.provider,
            action = %result.action,
            score = result.score,
            "Moderated text"
        );

        let entry = AuditLogEntry::new(
            Utc::now().timestamp(),
            text,
            &result,
            classification.provider,
        );
        self.audit.record(&entry).await;

        result
    }

    pub async fn recent_blocks(&self, limit: u32) -> Result<Vec<StoredAuditEntry>, AuditError> {
        self.audit.recent(limit).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
