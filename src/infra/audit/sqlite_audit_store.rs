// SQLite-backed audit collection.
//
// Table `{database}_{collection}` (names are validated identifiers, see config):
// - id: INTEGER PRIMARY KEY, exposed as the entry's display id
// - ts, raw, action, score, reason, matched_seed: the decision itself
// - meta: JSON document (provider attribution)

use crate::core::audit::{AuditError, AuditLogEntry, AuditMeta, AuditStore, StoredAuditEntry};
use crate::core::moderation::Action;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::types::Json;
use sqlx::{Pool, Row, Sqlite};
use std::time::Duration;

fn storage_error(e: sqlx::Error) -> AuditError {
    AuditError::StorageError(e.to_string())
}

pub struct SqliteAuditStore {
    pool: Pool<Sqlite>,
    table: String,
}

impl SqliteAuditStore {
    pub fn new(pool: Pool<Sqlite>, table: String) -> Self {
        Self { pool, table }
    }

    /// Connects, checks the connection with a trivial query and creates the
    /// table if needed.
    pub async fn connect(
        uri: &str,
        table: String,
        acquire_timeout: Duration,
    ) -> Result<Self, AuditError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(acquire_timeout)
            .connect(uri)
            .await
            .map_err(storage_error)?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(storage_error)?;

        let store = Self::new(pool, table);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), AuditError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ts INTEGER NOT NULL,
                raw TEXT NOT NULL,
                action TEXT NOT NULL,
                score REAL NOT NULL,
                reason TEXT NOT NULL,
                matched_seed TEXT,
                meta TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_ts ON {table}(ts);
            "#,
            table = self.table
        ))
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(())
    }
}

fn parse_action(raw: &str) -> Result<Action, AuditError> {
    match raw {
        "allow" => Ok(Action::Allow),
        "review" => Ok(Action::Review),
        "block" => Ok(Action::Block),
        other => Err(AuditError::StorageError(format!(
            "unknown action in audit row: {}",
            other
        ))),
    }
}

#[async_trait]
impl AuditStore for SqliteAuditStore {
    async fn insert(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (ts, raw, action, score, reason, matched_seed, meta)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            self.table
        ))
        .bind(entry.timestamp)
        .bind(&entry.raw)
        .bind(entry.action.to_string())
        .bind(entry.score)
        .bind(&entry.reason)
        .bind(&entry.matched_seed)
        .bind(Json(&entry.meta))
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<StoredAuditEntry>, AuditError> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} ORDER BY ts DESC, id DESC LIMIT ?",
            self.table
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.into_iter()
            .map(|row| {
                let id: i64 = row.try_get("id").map_err(storage_error)?;
                let action: String = row.try_get("action").map_err(storage_error)?;
                let meta: Json<AuditMeta> = row.try_get("meta").map_err(storage_error)?;
                Ok(StoredAuditEntry {
                    id: id.to_string(),
                    entry: AuditLogEntry {
                        timestamp: row.try_get("ts").map_err(storage_error)?,
                        raw: row.try_get("raw").map_err(storage_error)?,
                        action: parse_action(&action)?,
                        score: row.try_get("score").map_err(storage_error)?,
                        reason: row.try_get("reason").map_err(storage_error)?,
                        matched_seed: row.try_get("matched_seed").map_err(storage_error)?,
                        meta: meta.0,
                    },
                })
            })
            .collect()
    }
}
