//! # Planting Repository
//!
//! Database operations for plantings and the per-crop farm count.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::farm::to_count;
use agro_core::{CropIdCount, NewPlanting, Planting};

/// Repository for planting database operations.
#[derive(Debug, Clone)]
pub struct PlantingRepository {
    pool: SqlitePool,
}

impl PlantingRepository {
    /// Creates a new PlantingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PlantingRepository { pool }
    }

    pub async fn get_by_farm_season_crop(
        &self,
        farm_id: &str,
        season_id: &str,
        crop_id: &str,
    ) -> DbResult<Option<Planting>> {
        let planting = sqlx::query_as::<_, Planting>(
            r#"
            SELECT id, planted_area, planting_date, expected_harvest_date, notes,
                   farm_id, season_id, crop_id, created_at
            FROM plantings
            WHERE farm_id = ?1 AND season_id = ?2 AND crop_id = ?3
            "#,
        )
        .bind(farm_id)
        .bind(season_id)
        .bind(crop_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(planting)
    }

    pub async fn insert(&self, data: &NewPlanting) -> DbResult<Planting> {
        debug!(
            farm_id = %data.farm_id,
            season_id = %data.season_id,
            crop_id = %data.crop_id,
            "Inserting planting"
        );

        let planting = Planting {
            id: Uuid::new_v4().to_string(),
            planted_area: data.planted_area,
            planting_date: data.planting_date,
            expected_harvest_date: data.expected_harvest_date,
            notes: data.notes.clone(),
            farm_id: data.farm_id.clone(),
            season_id: data.season_id.clone(),
            crop_id: data.crop_id.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO plantings (
                id, planted_area, planting_date, expected_harvest_date, notes,
                farm_id, season_id, crop_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&planting.id)
        .bind(planting.planted_area)
        .bind(planting.planting_date)
        .bind(planting.expected_harvest_date)
        .bind(planting.notes.as_deref())
        .bind(&planting.farm_id)
        .bind(&planting.season_id)
        .bind(&planting.crop_id)
        .bind(planting.created_at)
        .execute(&self.pool)
        .await?;

        Ok(planting)
    }

    /// Distinct farms per crop, most first.
    ///
    /// A farm planting the same crop in several seasons counts once.
    pub async fn farms_per_crop(&self) -> DbResult<Vec<CropIdCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT crop_id, COUNT(DISTINCT farm_id) AS count
            FROM plantings
            GROUP BY crop_id
            ORDER BY count DESC, crop_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(crop_id, count)| -> DbResult<CropIdCount> {
                Ok(CropIdCount {
                    crop_id,
                    count: to_count(count)?,
                })
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
