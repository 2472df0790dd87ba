pub mod sqlite_audit_store;

pub use sqlite_audit_store::SqliteAuditStore;
