//! # Producer Repository
//!
//! Database operations for producers.
//!
//! Tax IDs arrive here already normalized to digits; the UNIQUE index on
//! `producers.tax_id` is the final word on duplicates.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use agro_core::{NewProducer, Producer, ProducerUpdate};

const PRODUCER_COLUMNS: &str = "id, tax_id, name, created_at, updated_at";

/// Repository for producer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProducerRepository::new(pool);
/// let producer = repo.get_by_tax_id("52998224725").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProducerRepository {
    pool: SqlitePool,
}

impl ProducerRepository {
    /// Creates a new ProducerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProducerRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Producer>> {
        let sql = format!("SELECT {PRODUCER_COLUMNS} FROM producers WHERE id = ?1");
        let producer = sqlx::query_as::<_, Producer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(producer)
    }

    pub async fn get_by_tax_id(&self, tax_id: &str) -> DbResult<Option<Producer>> {
        let sql = format!("SELECT {PRODUCER_COLUMNS} FROM producers WHERE tax_id = ?1");
        let producer = sqlx::query_as::<_, Producer>(&sql)
            .bind(tax_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(producer)
    }

    /// Lists all producers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Producer>> {
        let sql = format!("SELECT {PRODUCER_COLUMNS} FROM producers ORDER BY name, id");
        let producers = sqlx::query_as::<_, Producer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = producers.len(), "Listed producers");
        Ok(producers)
    }

    /// Inserts a new producer.
    ///
    /// ## Returns
    /// The stored producer with generated ID and timestamps.
    pub async fn insert(&self, data: &NewProducer) -> DbResult<Producer> {
        debug!(tax_id = %data.tax_id, "Inserting producer");

        let now = Utc::now();
        let producer = Producer {
            id: Uuid::new_v4().to_string(),
            tax_id: data.tax_id.clone(),
            name: data.name.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO producers (id, tax_id, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&producer.id)
        .bind(&producer.tax_id)
        .bind(&producer.name)
        .bind(producer.created_at)
        .bind(producer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(producer)
    }

    /// Applies the `Some` fields of `data`.
    ///
    /// ## Errors
    /// - `NotFound` if no producer has `data.id`
    /// - `UniqueViolation` if the new tax ID is taken
    pub async fn update(&self, data: &ProducerUpdate) -> DbResult<Producer> {
        debug!(id = %data.id, "Updating producer");

        let sql = format!(
            r#"
            UPDATE producers SET
                name = COALESCE(?2, name),
                tax_id = COALESCE(?3, tax_id),
                updated_at = ?4
            WHERE id = ?1
            RETURNING {PRODUCER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Producer>(&sql)
            .bind(&data.id)
            .bind(data.name.as_deref())
            .bind(data.tax_id.as_deref())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Producer", &data.id))
    }

    /// Deletes a producer.
    ///
    /// Farms reference producers with `ON DELETE RESTRICT`, so this fails
    /// with `ForeignKeyViolation` while the producer still owns farms.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting producer");

        let result = sqlx::query("DELETE FROM producers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Producer", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn repo() -> ProducerRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.producers()
    }

    fn new_producer(name: &str, tax_id: &str) -> NewProducer {
        NewProducer {
            name: name.to_string(),
            tax_id: tax_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let inserted = repo
            .insert(&new_producer("João Silva", "52998224725"))
            .await
            .unwrap();

        let by_id = repo.get_by_id(&inserted.id).await.unwrap().unwrap();
        assert_eq!(by_id.tax_id, "52998224725");
        assert_eq!(by_id.name, "João Silva");

        let by_tax_id = repo.get_by_tax_id("52998224725").await.unwrap().unwrap();
        assert_eq!(by_tax_id.id, inserted.id);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_tax_id_is_unique_violation() {
        let repo = repo().await;
        repo.insert(&new_producer("A", "52998224725")).await.unwrap();

        let err = repo
            .insert(&new_producer("B", "52998224725"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, DbError::UniqueViolation { ref constraint } if constraint == "producers.tax_id")
        );
    }

    #[tokio::test]
    async fn test_update_partial() {
        let repo = repo().await;
        let producer = repo.insert(&new_producer("A", "52998224725")).await.unwrap();

        let updated = repo
            .update(&ProducerUpdate {
                id: producer.id.clone(),
                name: Some("Ana".to_string()),
                tax_id: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.tax_id, "52998224725");
        assert!(updated.updated_at >= producer.updated_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = repo().await;
        let err = repo
            .update(&ProducerUpdate {
                id: "missing".to_string(),
                name: None,
                tax_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let repo = repo().await;
        repo.insert(&new_producer("Zé", "52998224725")).await.unwrap();
        repo.insert(&new_producer("Ana", "12345678909")).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Ana", "Zé"]);
    }
}
