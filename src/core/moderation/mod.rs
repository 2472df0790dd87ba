// Core moderation module - request/verdict types, the threshold policy and the pipeline.

pub mod moderation_models;
pub mod moderation_policy;
pub mod moderation_service;

pub use moderation_models::*;
pub use moderation_policy::DecisionPolicy;
pub use moderation_service::ModerationService;
