//! # Reorder Point Repository
//!
//! The stock report flags an article as "NECESARIO" when its quantity is at
//! or below its reorder point. Points are local to this machine; an article
//! without one uses 0.

use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for reorder points.
///
/// Article ids are stored trimmed and upper-cased, matching catalog ids.
#[derive(Debug, Clone)]
pub struct ReorderPointRepository {
    pool: SqlitePool,
}

impl ReorderPointRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReorderPointRepository { pool }
    }

    /// Reorder point of one article; 0 when none was set.
    pub async fn get(&self, article_id: &str) -> DbResult<u32> {
        let key = normalize(article_id);
        let point: Option<i64> =
            sqlx::query_scalar("SELECT point FROM reorder_points WHERE article_id = ?1")
                .bind(&key)
                .fetch_optional(&self.pool)
                .await?;

        point.map_or(Ok(0), |p| to_point(&key, p))
    }

    /// Sets (or replaces) the reorder point of an article.
    pub async fn set(&self, article_id: &str, point: u32) -> DbResult<()> {
        let key = normalize(article_id);
        debug!(article_id = %key, point, "Saving reorder point");

        sqlx::query(
            r#"
            INSERT INTO reorder_points (article_id, point, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(article_id) DO UPDATE SET
                point = excluded.point,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&key)
        .bind(i64::from(point))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes an article's point, so it falls back to 0. Returns whether a
    /// row existed.
    pub async fn remove(&self, article_id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM reorder_points WHERE article_id = ?1")
            .bind(normalize(article_id))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every stored point, keyed by article id.
    pub async fn all(&self) -> DbResult<HashMap<String, u32>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT article_id, point FROM reorder_points")
                .fetch_all(&self.pool)
                .await?;

        debug!(count = rows.len(), "Loaded reorder points");
        rows.into_iter()
            .map(|(id, p)| to_point(&id, p).map(|p| (id, p)))
            .collect()
    }
}

fn normalize(article_id: &str) -> String {
    article_id.trim().to_uppercase()
}

fn to_point(article_id: &str, raw: i64) -> DbResult<u32> {
    u32::try_from(raw).map_err(|_| {
        DbError::corrupt(
            "reorder_points",
            format!("point {raw} for {article_id} is out of range"),
        )
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_point_is_zero() {
        let db = db().await;
        assert_eq!(db.reorder_points().get("A1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_overwrites_and_normalizes() {
        let db = db().await;
        let repo = db.reorder_points();

        repo.set(" a1 ", 4).await.unwrap();
        repo.set("A1", 7).await.unwrap();
        repo.set("AN2", 0).await.unwrap();

        assert_eq!(repo.get("a1").await.unwrap(), 7);

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["A1"], 7);
        assert_eq!(all["AN2"], 0);
    }

    #[tokio::test]
    async fn test_remove() {
        let db = db().await;
        let repo = db.reorder_points();

        repo.set("C3", 2).await.unwrap();
        assert!(repo.remove("c3").await.unwrap());
        assert!(!repo.remove("C3").await.unwrap());
        assert_eq!(repo.get("C3").await.unwrap(), 0);
    }
}
