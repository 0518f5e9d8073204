// src/progress/store.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::SqlitePool;

/// Failure to read or write a persisted progress value.
#[derive(Debug)]
pub enum StoreError {
    /// The backing storage cannot be used at all.
    Unavailable(String),

    // Query failed
    Database(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "progress storage unavailable: {}", msg),
            StoreError::Database(msg) => write!(f, "progress storage query failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Named-value persistence behind the progress tracker.
///
/// The tracker only ever uses two names (see `config::XP_STORAGE_KEY` and
/// `config::CREDITED_KEYS_STORAGE_KEY`), both holding plain strings.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn load(&self, name: &str) -> Result<Option<String>, StoreError>;

    async fn save(&self, name: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store. Clones share the same values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Arc::new(Mutex::new(map)),
        }
    }

    /// Raw persisted value, for inspection.
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.lock().ok()?.get(name).cloned()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn load(&self, name: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(values.get(name).cloned())
    }

    async fn save(&self, name: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Per-learner rows in the `learner_progress` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    learner_id: String,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, learner_id: impl Into<String>) -> Self {
        Self {
            pool,
            learner_id: learner_id.into(),
        }
    }
}

#[async_trait]
impl ProgressStore for SqliteStore {
    async fn load(&self, name: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM learner_progress WHERE learner_id = ? AND name = ?",
        )
        .bind(&self.learner_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn save(&self, name: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO learner_progress (learner_id, name, value)
            VALUES (?, ?, ?)
            ON CONFLICT(learner_id, name) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&self.learner_id)
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
