// Moderation domain models - the request/verdict types of the gateway.
//
// These are plain data types with no HTTP or provider dependencies.
// The HTTP layer deserializes into them and serializes them back out.

use serde::{Deserialize, Serialize};

fn default_mode() -> String {
    "comment".to_string()
}

/// A single piece of text submitted for moderation.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationRequest {
    pub text: String,
    /// Where the text comes from (e.g. "comment"). Carried for logging only.
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl ModerationRequest {
    #[cfg(test)]
    pub fn comment(text: &str) -> Self {
        Self {
            text: text.to_string(),
            mode: default_mode(),
        }
    }
}

/// The verdict for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Allow,
    Review,
    Block,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Allow => write!(f, "allow"),
            Action::Review => write!(f, "review"),
            Action::Block => write!(f, "block"),
        }
    }
}

/// Result returned to the caller of `/moderate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResult {
    pub action: Action,
    pub score: f64,
    pub reason: String,
    pub matched_seed: Option<String>,
}

impl ModerationResult {
    /// Verdict for empty or whitespace-only input.
    pub fn empty_text() -> Self {
        Self {
            action: Action::Allow,
            score: 0.0,
            reason: "empty_text".to_string(),
            matched_seed: None,
        }
    }

    /// Fixed verdict served while mock mode is on.
    pub fn mock() -> Self {
        Self {
            action: Action::Allow,
            score: 0.05,
            reason: "mock".to_string(),
            matched_seed: None,
        }
    }
}
