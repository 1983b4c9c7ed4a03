//! # Crop Repository
//!
//! Database operations for crops.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use agro_core::{Crop, CropName, NewCrop};

/// Repository for crop database operations.
#[derive(Debug, Clone)]
pub struct CropRepository {
    pool: SqlitePool,
}

impl CropRepository {
    /// Creates a new CropRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CropRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Crop>> {
        let crop = sqlx::query_as::<_, Crop>(
            "SELECT id, name, description, category FROM crops WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(crop)
    }

    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Crop>> {
        let crop = sqlx::query_as::<_, Crop>(
            "SELECT id, name, description, category FROM crops WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(crop)
    }

    /// Resolves crop IDs to names. IDs without a row are left out.
    pub async fn names_by_ids(&self, ids: &[String]) -> DbResult<Vec<CropName>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, name FROM crops WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows: Vec<(String, String)> = builder.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| CropName { id, name })
            .collect())
    }

    /// Lists all crops, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Crop>> {
        let crops = sqlx::query_as::<_, Crop>(
            "SELECT id, name, description, category FROM crops ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(crops)
    }

    pub async fn insert(&self, data: &NewCrop) -> DbResult<Crop> {
        debug!(name = %data.name, "Inserting crop");

        let crop = Crop {
            id: Uuid::new_v4().to_string(),
            name: data.name.clone(),
            description: data.description.clone(),
            category: data.category.clone(),
        };

        sqlx::query("INSERT INTO crops (id, name, description, category) VALUES (?1, ?2, ?3, ?4)")
            .bind(&crop.id)
            .bind(&crop.name)
            .bind(crop.description.as_deref())
            .bind(crop.category.as_deref())
            .execute(&self.pool)
            .await?;

        Ok(crop)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
