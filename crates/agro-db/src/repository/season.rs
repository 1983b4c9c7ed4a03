//! # Season Repository
//!
//! Database operations for harvest seasons.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use agro_core::{NewSeason, Season};

/// Repository for season database operations.
#[derive(Debug, Clone)]
pub struct SeasonRepository {
    pool: SqlitePool,
}

impl SeasonRepository {
    /// Creates a new SeasonRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SeasonRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Season>> {
        let season = sqlx::query_as::<_, Season>(
            r#"
            SELECT id, name, year, start_date, end_date, active
            FROM seasons
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(season)
    }

    pub async fn get_by_name_and_year(&self, name: &str, year: i32) -> DbResult<Option<Season>> {
        let season = sqlx::query_as::<_, Season>(
            r#"
            SELECT id, name, year, start_date, end_date, active
            FROM seasons
            WHERE name = ?1 AND year = ?2
            "#,
        )
        .bind(name)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(season)
    }

    pub async fn insert(&self, data: &NewSeason) -> DbResult<Season> {
        debug!(name = %data.name, year = data.year, "Inserting season");

        let season = Season {
            id: Uuid::new_v4().to_string(),
            name: data.name.clone(),
            year: data.year,
            start_date: data.start_date,
            end_date: data.end_date,
            active: data.active,
        };

        sqlx::query(
            r#"
            INSERT INTO seasons (id, name, year, start_date, end_date, active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&season.id)
        .bind(&season.name)
        .bind(season.year)
        .bind(season.start_date)
        .bind(season.end_date)
        .bind(season.active)
        .execute(&self.pool)
        .await?;

        Ok(season)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};

    fn new_season(name: &str, year: i32, active: bool) -> NewSeason {
        NewSeason {
            name: name.to_string(),
            year,
            start_date: NaiveDate::from_ymd_opt(year, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(year + 1, 8, 31).unwrap(),
            active,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.seasons();

        let season = repo
            .insert(&new_season("Safra 2023/2024", 2023, false))
            .await
            .unwrap();

        let loaded = repo.get_by_id(&season.id).await.unwrap().unwrap();
        assert_eq!(loaded, season);
        assert!(!loaded.active);

        let by_key = repo
            .get_by_name_and_year("Safra 2023/2024", 2023)
            .await
            .unwrap();
        assert_eq!(by_key, Some(season));
        assert!(repo
            .get_by_name_and_year("Safra 2023/2024", 2024)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_name_and_year_are_unique_together() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.seasons();

        repo.insert(&new_season("Safra", 2023, true)).await.unwrap();
        repo.insert(&new_season("Safra", 2024, true)).await.unwrap();

        let err = repo
            .insert(&new_season("Safra", 2024, true))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
