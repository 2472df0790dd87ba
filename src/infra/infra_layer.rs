// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "audit/mod.rs"]
pub mod audit;
