// Classifier service - asks external models how toxic a text is.
//
// Providers are tried in the order they were registered. Each attempt yields a
// `Result`; the first `Ok` wins, and when every attempt fails (or none are
// registered) the chain answers with `Verdict::fallback()`.

use super::classifier_models::{Classification, ProviderError, ProviderKind, Verdict};
use async_trait::async_trait;
use std::sync::Arc;

pub const SYSTEM_PROMPT: &str = "You are a concise JSON-output content-moderation assistant.";

/// Builds the user prompt sent to every provider.
pub fn build_prompt(text: &str) -> String {
    format!(
        "You are a content-moderation assistant. \
         Given the input message, return EXACTLY valid JSON with fields: \
         'score' (0.0-1.0), 'label' (one of: rude|sexual|hate|harassment|other), \
         'matched_seed' (offending token/phrase or null). Return JSON only.\n\n\
         Message:\n\"\"\"\n{}\n\"\"\"",
        text
    )
}

#[async_trait]
pub trait ModerationProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Classifies the prompt. Any failure, including an answer without a
    /// usable score, is reported as an error so the chain can move on.
    async fn classify(&self, prompt: &str) -> Result<Verdict, ProviderError>;

    /// Cheap reachability check run once at startup.
    async fn probe(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Ordered list of providers with a synthesized default at the end.
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn ModerationProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn ModerationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.providers.iter().any(|p| p.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    pub async fn classify(&self, prompt: &str) -> Classification {
        for provider in &self.providers {
            match provider.classify(prompt).await {
                Ok(verdict) => {
                    tracing::debug!(provider = %provider.kind(), score = verdict.score, "Provider answered");
                    return Classification {
                        verdict,
                        provider: provider.kind(),
                    };
                }
                Err(e) => {
                    tracing::warn!(provider = %provider.kind(), "Provider failed: {}", e);
                }
            }
        }

        Classification {
            verdict: Verdict::fallback(),
            provider: ProviderKind::None,
        }
    }
}
