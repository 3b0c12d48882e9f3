use sqlx::Row;

use crate::db::DbPool;

/// Async access to the `entries` table of one map database.
#[derive(Clone)]
pub struct Storage {
    pool: DbPool,
}

impl Storage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row = sqlx::query("SELECT value FROM entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Every key, in insertion order.
    pub async fn keys(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT key FROM entries ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        let now = chrono::Utc::now().timestamp_millis();
        sqlx::query(
            "INSERT INTO entries (key, value, updated) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated = excluded.updated",
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
