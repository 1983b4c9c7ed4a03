//! # Farm Repository
//!
//! Database operations for farms, plus the farm-level dashboard aggregates.
//!
//! ## Aggregates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  count()           SELECT COUNT(*)                                      │
//! │  sum_total_area()  SELECT COALESCE(SUM(total_area), 0)                  │
//! │  count_by_state()  GROUP BY state ORDER BY count DESC, state            │
//! │  land_usage()      SUM(arable_area), SUM(vegetation_area)               │
//! │                                                                         │
//! │  Areas are INTEGER hundredths, so every SUM is exact.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use agro_core::{Farm, Hectares, LandUsage, NewFarm, StateCount};

/// Repository for farm database operations.
#[derive(Debug, Clone)]
pub struct FarmRepository {
    pool: SqlitePool,
}

impl FarmRepository {
    /// Creates a new FarmRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FarmRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Farm>> {
        let farm = sqlx::query_as::<_, Farm>(
            r#"
            SELECT id, name, city, state, total_area, arable_area, vegetation_area,
                   producer_id, created_at, updated_at
            FROM farms
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(farm)
    }

    /// Inserts a new farm.
    ///
    /// The area invariant is checked by the rules before this runs; the
    /// schema only rejects negative areas.
    pub async fn insert(&self, data: &NewFarm) -> DbResult<Farm> {
        debug!(producer_id = %data.producer_id, state = %data.state, "Inserting farm");

        let now = Utc::now();
        let farm = Farm {
            id: Uuid::new_v4().to_string(),
            name: data.name.clone(),
            city: data.city.clone(),
            state: data.state.clone(),
            total_area: data.total_area,
            arable_area: data.arable_area,
            vegetation_area: data.vegetation_area,
            producer_id: data.producer_id.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO farms (
                id, name, city, state, total_area, arable_area, vegetation_area,
                producer_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&farm.id)
        .bind(&farm.name)
        .bind(&farm.city)
        .bind(&farm.state)
        .bind(farm.total_area)
        .bind(farm.arable_area)
        .bind(farm.vegetation_area)
        .bind(&farm.producer_id)
        .bind(farm.created_at)
        .bind(farm.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(farm)
    }

    /// Counts all farms.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM farms")
            .fetch_one(&self.pool)
            .await?;

        to_count(count)
    }

    /// Sum of all total areas; zero for an empty table.
    pub async fn sum_total_area(&self) -> DbResult<Hectares> {
        let sum: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_area), 0) FROM farms")
            .fetch_one(&self.pool)
            .await?;

        Ok(Hectares::from_hundredths(sum))
    }

    /// Farms per state, most first.
    pub async fn count_by_state(&self) -> DbResult<Vec<StateCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT state, COUNT(*) AS count
            FROM farms
            GROUP BY state
            ORDER BY count DESC, state ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(state, count)| -> DbResult<StateCount> {
                Ok(StateCount {
                    state,
                    count: to_count(count)?,
                })
            })
            .collect()
    }

    /// Arable and vegetation totals over all farms.
    pub async fn land_usage(&self) -> DbResult<LandUsage> {
        let (arable, vegetation): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(arable_area), 0), COALESCE(SUM(vegetation_area), 0)
            FROM farms
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(LandUsage {
            arable_total: Hectares::from_hundredths(arable),
            vegetation_total: Hectares::from_hundredths(vegetation),
        })
    }
}

/// Converts an SQL `COUNT` to `u64`.
pub(crate) fn to_count(count: i64) -> DbResult<u64> {
    u64::try_from(count).map_err(|_| DbError::Internal(format!("negative row count: {count}")))
}

// =============================================================================
// Unit Tests
// =============================================================================
