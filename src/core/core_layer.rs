// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "config/gateway_config.rs"]
pub mod config;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "classifier/mod.rs"]
pub mod classifier;

#[path = "audit/mod.rs"]
pub mod audit;
