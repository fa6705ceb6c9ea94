//! Key-Value State Store
//!
//! This module provides the string-keyed persistence layer everything else
//! in this crate sits on. Values are JSON strings; the store itself does not
//! interpret them. Writes are checked against a byte quota so one runaway
//! value cannot consume the whole store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{Error, Result};

/// Default store quota in bytes (10 MiB)
pub const DEFAULT_QUOTA_BYTES: u64 = 10 * 1024 * 1024;

/// Async string-keyed store
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a value, `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    ///
    /// Fails with [`Error::QuotaExceeded`] when the write would push total
    /// stored bytes past the quota; existing data is left untouched.
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Total stored bytes across all values
    async fn usage(&self) -> Result<u64>;
}

/// SQLite-backed store
pub struct SqliteStore {
    pool: SqlitePool,
    quota_bytes: u64,
}

impl SqliteStore {
    /// Create a store over an existing pool
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }

    /// Connect to a database URL and initialize the schema
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(url).await?;
        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Set the byte quota
    #[must_use]
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Initialize the database schema
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS easel_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Bytes stored under keys other than `key`
    async fn usage_excluding(&self, key: &str) -> Result<u64> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0) AS used FROM easel_state WHERE key != ?",
        )
        .bind(key)
        .fetch_one(&self.pool)
        .await?;
        let used: i64 = row.get("used");
        Ok(used.max(0) as u64)
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM easel_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("value")))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let other = self.usage_excluding(key).await?;
        let incoming = value.len() as u64;
        if other + incoming > self.quota_bytes {
            return Err(Error::QuotaExceeded {
                used: other + incoming,
                limit: self.quota_bytes,
            });
        }

        sqlx::query(
            r#"
            INSERT INTO easel_state (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM easel_state WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn usage(&self) -> Result<u64> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0) AS used FROM easel_state",
        )
        .fetch_one(&self.pool)
        .await?;
        let used: i64 = row.get("used");
        Ok(used.max(0) as u64)
    }
}

/// In-memory store for tests and previews
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    quota_bytes: u64,
}

impl MemoryStore {
    /// Create an empty store with the default quota
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }

    /// Set the byte quota
    #[must_use]
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().await;
        let other: u64 = values
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len() as u64)
            .sum();
        let incoming = value.len() as u64;
        if other + incoming > self.quota_bytes {
            return Err(Error::QuotaExceeded {
                used: other + incoming,
                limit: self.quota_bytes,
            });
        }
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.write().await.remove(key);
        Ok(())
    }

    async fn usage(&self) -> Result<u64> {
        Ok(self
            .values
            .read()
            .await
            .values()
            .map(|v| v.len() as u64)
            .sum())
    }
}
