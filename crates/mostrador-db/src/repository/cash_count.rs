//! # Cash Count Repository
//!
//! One row per calendar day holding the opening and closing amounts of the
//! drawer. Saving a day again replaces the previous count.

use chrono::{DateTime, NaiveDate, Utc};
use mostrador_core::cash::CashCount;
use mostrador_core::Money;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, FromRow)]
struct CashCountRow {
    opening_cents: Option<i64>,
    closing_cents: Option<i64>,
    saved_at: DateTime<Utc>,
}

impl From<CashCountRow> for CashCount {
    fn from(row: CashCountRow) -> Self {
        CashCount {
            opening: row.opening_cents.map(Money::from_cents),
            closing: row.closing_cents.map(Money::from_cents),
            saved_at: row.saved_at,
        }
    }
}

/// Repository for daily cash counts.
#[derive(Debug, Clone)]
pub struct CashCountRepository {
    pool: SqlitePool,
}

impl CashCountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CashCountRepository { pool }
    }

    /// The count saved for `date`, if any.
    pub async fn get(&self, date: NaiveDate) -> DbResult<Option<CashCount>> {
        let row: Option<CashCountRow> = sqlx::query_as(
            "SELECT opening_cents, closing_cents, saved_at FROM cash_counts WHERE count_date = ?1",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CashCount::from))
    }

    /// Saves the count for `date`, replacing any earlier one.
    pub async fn save(&self, date: NaiveDate, count: &CashCount) -> DbResult<()> {
        debug!(
            %date,
            opening = ?count.opening.map(|m| m.cents()),
            closing = ?count.closing.map(|m| m.cents()),
            "Saving cash count"
        );

        sqlx::query(
            r#"
            INSERT INTO cash_counts (count_date, opening_cents, closing_cents, saved_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(count_date) DO UPDATE SET
                opening_cents = excluded.opening_cents,
                closing_cents = excluded.closing_cents,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(date)
        .bind(count.opening.map(|m| m.cents()))
        .bind(count.closing.map(|m| m.cents()))
        .bind(count.saved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts saved between `from` and `to` (inclusive), oldest first.
    pub async fn list(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<(NaiveDate, CashCount)>> {
        let rows: Vec<(NaiveDate, Option<i64>, Option<i64>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT count_date, opening_cents, closing_cents, saved_at
            FROM cash_counts
            WHERE count_date BETWEEN ?1 AND ?2
            ORDER BY count_date
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, opening_cents, closing_cents, saved_at)| {
                let row = CashCountRow {
                    opening_cents,
                    closing_cents,
                    saved_at,
                };
                (date, CashCount::from(row))
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_day() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.cash_counts().get(day(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_replace() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cash_counts();

        let opening = CashCount {
            opening: Some(Money::from_cents(10_000)),
            closing: None,
            saved_at: at(9),
        };
        repo.save(day(1), &opening).await.unwrap();
        assert_eq!(repo.get(day(1)).await.unwrap(), Some(opening));

        let closed = CashCount {
            opening: Some(Money::from_cents(10_000)),
            closing: Some(Money::from_cents(25_050)),
            saved_at: at(20),
        };
        repo.save(day(1), &closed).await.unwrap();
        assert_eq!(repo.get(day(1)).await.unwrap(), Some(closed));
    }

    #[tokio::test]
    async fn test_list_range() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cash_counts();

        for d in [3, 1, 2, 9] {
            let count = CashCount {
                opening: None,
                closing: Some(Money::from_cents(i64::from(d) * 100)),
                saved_at: at(d),
            };
            repo.save(day(d), &count).await.unwrap();
        }

        let listed = repo.list(day(1), day(3)).await.unwrap();
        let dates: Vec<NaiveDate> = listed.iter().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(listed[1].1.closing, Some(Money::from_cents(200)));
    }
}
