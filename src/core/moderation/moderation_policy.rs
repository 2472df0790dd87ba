// Decision policy - maps a score to an action with two fixed thresholds.

use super::moderation_models::Action;
use crate::core::config::{DEFAULT_BLOCK_THRESHOLD, DEFAULT_REVIEW_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    pub block_threshold: f64,
    pub review_threshold: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            block_threshold: DEFAULT_BLOCK_THRESHOLD,
            review_threshold: DEFAULT_REVIEW_THRESHOLD,
        }
    }
}

impl DecisionPolicy {
    pub fn new(block_threshold: f64, review_threshold: f64) -> Self {
        Self {
            block_threshold,
            review_threshold,
        }
    }

    /// Lower bounds are inclusive: a score sitting exactly on a threshold
    /// gets the stricter action.
    pub fn decide(&self, score: f64) -> Action {
        if score >= self.block_threshold {
            Action::Block
        } else if score >= self.review_threshold {
            Action::Review
        } else {
            Action::Allow
        }
    }
}
