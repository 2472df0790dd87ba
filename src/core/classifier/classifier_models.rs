use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which external classifier produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Groq,
    #[serde(rename = "hf")]
    HuggingFace,
    /// No provider answered; the score is the synthesized default.
    None,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Groq => write!(f, "groq"),
            ProviderKind::HuggingFace => write!(f, "hf"),
            ProviderKind::None => write!(f, "none"),
        }
    }
}

/// Normalized classifier output: `(score, label, matched_seed)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub score: f64,
    pub label: String,
    pub matched_seed: Option<String>,
}

impl Verdict {
    pub const DEFAULT_LABEL: &'static str = "other";

    /// Used when no provider produced a usable score.
    pub fn fallback() -> Self {
        Self {
            score: 0.5,
            label: Self::DEFAULT_LABEL.to_string(),
            matched_seed: None,
        }
    }

    pub fn reason(&self) -> String {
        format!("llm_{}", self.label)
    }
}

/// A verdict together with the provider it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,
    pub provider: ProviderKind,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response had no text content")]
    EmptyResponse,

    #[error("response was not a JSON object: {0}")]
    NotJson(String),

    #[error("response JSON had no usable score")]
    MissingScore,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}
