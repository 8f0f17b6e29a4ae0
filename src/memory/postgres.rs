//! Postgres memory store
//!
//! Backs [`MemoryStore`] with the `states` table created by the
//! `migrations/` directory.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use crate::models::StoredMemory;
use crate::utils::errors::SkillflowError;
use super::store::MemoryStore;

#[derive(Debug, Clone)]
pub struct PgMemoryStore {
    pool: PgPool,
}

impl PgMemoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every entry a user has stored for a package
    pub async fn list(&self, package: &str, user_id: i64) -> Result<Vec<StoredMemory>, SkillflowError> {
        let rows = sqlx::query_as::<_, StoredMemory>(
            "SELECT key, value, pkgname, userid, created_at, updated_at FROM states WHERE userid = $1 AND pkgname = $2 ORDER BY key"
        )
        .bind(user_id)
        .bind(package)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl MemoryStore for PgMemoryStore {
    async fn get(&self, package: &str, user_id: i64, key: &str) -> Result<Option<Vec<u8>>, SkillflowError> {
        let value: Option<(Vec<u8>,)> = sqlx::query_as(
            "SELECT value FROM states WHERE userid = $1 AND pkgname = $2 AND key = $3"
        )
        .bind(user_id)
        .bind(package)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value.map(|row| row.0))
    }

    async fn set(&self, package: &str, user_id: i64, key: &str, value: &[u8]) -> Result<(), SkillflowError> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO states (key, value, pkgname, userid, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (userid, pkgname, key) DO UPDATE SET value = $2, updated_at = $5
            "#
        )
        .bind(key)
        .bind(value)
        .bind(package)
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(pkg = package, user_id = user_id, key = key, "Memory upserted");
        Ok(())
    }

    async fn forget_all(&self, package: &str, user_id: i64) -> Result<u64, SkillflowError> {
        let result = sqlx::query("DELETE FROM states WHERE userid = $1 AND pkgname = $2")
            .bind(user_id)
            .bind(package)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{health_check, run_migrations};

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        run_migrations(&pool).await.ok()?;
        health_check(&pool).await.ok()?;
        Some(pool)
    }

    #[tokio::test]
    async fn test_upsert_replaces_value() {
        // Requires a Postgres instance; skipped when TEST_DATABASE_URL is unset
        let Some(pool) = test_pool().await else {
            return;
        };
        let store = PgMemoryStore::new(pool);
        let user_id = 990_001;

        store.forget_all("pg_test", user_id).await.unwrap();
        assert_eq!(store.get("pg_test", user_id, "color").await.unwrap(), None);

        store.set("pg_test", user_id, "color", br#""red""#).await.unwrap();
        store.set("pg_test", user_id, "color", br#""blue""#).await.unwrap();

        let value = store.get("pg_test", user_id, "color").await.unwrap();
        assert_eq!(value, Some(br#""blue""#.to_vec()));
        assert_eq!(store.list("pg_test", user_id).await.unwrap().len(), 1);

        // Same key under another package is independent
        assert_eq!(store.get("other_pkg", user_id, "color").await.unwrap(), None);

        assert_eq!(store.forget_all("pg_test", user_id).await.unwrap(), 1);
    }
}
