// Core audit module - what gets persisted about blocked content, and when.

pub mod audit_models;
pub mod audit_service;

pub use audit_models::*;
pub use audit_service::{AuditError, AuditLogger, AuditStore};
