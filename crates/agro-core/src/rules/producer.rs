//! # Producer Rules
//!
//! Registration, update and removal of producers.
//!
//! A producer's tax ID must be a valid CPF or CNPJ and unique across the
//! registry. IDs are compared and stored in normalized (digits-only) form,
//! so "529.982.247-25" and "52998224725" collide.

use std::sync::Arc;

use crate::document::{is_valid_document, normalize_document};
use crate::error::{CoreError, CoreResult, EntityKind};
use crate::observer::{observe, RuleObserver, TracingObserver};
use crate::rules::duplicate_or;
use crate::store::RegistryStore;
use crate::types::{NewProducer, Producer, ProducerUpdate};

/// Rule service for producers.
pub struct ProducerRules<S: ?Sized> {
    store: Arc<S>,
    observer: Arc<dyn RuleObserver>,
}

impl<S: ?Sized> Clone for ProducerRules<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<S: RegistryStore + ?Sized> ProducerRules<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the default [`TracingObserver`].
    pub fn with_observer(mut self, observer: Arc<dyn RuleObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Registers a producer.
    ///
    /// ## Errors
    /// - `InvalidDocument` if the tax ID fails the CPF/CNPJ checksum
    /// - `DuplicateDocument` if another producer already holds it
    pub async fn create_producer(&self, input: NewProducer) -> CoreResult<Producer> {
        observe(self.observer.as_ref(), "create_producer", self.create(input)).await
    }

    /// Applies a partial update.
    ///
    /// A new tax ID is validated and checked for duplicates; keeping the
    /// producer's own tax ID is not a conflict.
    pub async fn update_producer(&self, input: ProducerUpdate) -> CoreResult<Producer> {
        observe(self.observer.as_ref(), "update_producer", self.update(input)).await
    }

    /// Removes a producer.
    ///
    /// Farms are not cascaded; the store rejects deleting a producer that
    /// still owns farms and that error is returned unchanged.
    pub async fn delete_producer(&self, id: &str) -> CoreResult<()> {
        observe(self.observer.as_ref(), "delete_producer", self.delete(id)).await
    }

    pub async fn find_producer(&self, id: &str) -> CoreResult<Producer> {
        observe(self.observer.as_ref(), "find_producer", self.find(id)).await
    }

    /// All producers, ordered by name.
    pub async fn list_producers(&self) -> CoreResult<Vec<Producer>> {
        observe(self.observer.as_ref(), "list_producers", async {
            self.store.list_producers().await.map_err(CoreError::from)
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Rule bodies
    // -------------------------------------------------------------------------

    async fn create(&self, input: NewProducer) -> CoreResult<Producer> {
        if !is_valid_document(&input.tax_id) {
            return Err(CoreError::InvalidDocument {
                tax_id: input.tax_id,
            });
        }

        let tax_id = normalize_document(&input.tax_id);

        if self.store.find_producer_by_tax_id(&tax_id).await?.is_some() {
            return Err(CoreError::DuplicateDocument { tax_id });
        }

        let data = NewProducer {
            name: input.name,
            tax_id,
        };

        self.store.create_producer(&data).await.map_err(|e| {
            duplicate_or(e, || CoreError::DuplicateDocument {
                tax_id: data.tax_id.clone(),
            })
        })
    }

    async fn update(&self, input: ProducerUpdate) -> CoreResult<Producer> {
        self.find(&input.id).await?;

        let tax_id = match input.tax_id {
            Some(raw) => {
                if !is_valid_document(&raw) {
                    return Err(CoreError::InvalidDocument { tax_id: raw });
                }

                let tax_id = normalize_document(&raw);
                let holder = self.store.find_producer_by_tax_id(&tax_id).await?;
                if holder.is_some_and(|p| p.id != input.id) {
                    return Err(CoreError::DuplicateDocument { tax_id });
                }

                Some(tax_id)
            }
            None => None,
        };

        let data = ProducerUpdate {
            id: input.id,
            name: input.name,
            tax_id,
        };

        self.store.update_producer(&data).await.map_err(|e| {
            duplicate_or(e, || CoreError::DuplicateDocument {
                tax_id: data.tax_id.clone().unwrap_or_default(),
            })
        })
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.find(id).await?;
        self.store.delete_producer(id).await?;
        Ok(())
    }

    async fn find(&self, id: &str) -> CoreResult<Producer> {
        self.store
            .find_producer_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityKind::Producer, id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StoreError};
    use crate::observer::tests::RecordingObserver;
    use crate::rules::farm::FarmRules;
    use crate::rules::fixtures::*;
    use crate::store::MemoryStore;

    fn rules() -> (Arc<MemoryStore>, ProducerRules<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Arc::clone(&store), ProducerRules::new(store))
    }

    #[tokio::test]
    async fn test_create_producer() {
        let (_, rules) = rules();
        let producer = rules.create_producer(new_producer(VALID_CPF)).await.unwrap();

        assert_eq!(producer.tax_id, VALID_CPF);
        assert_eq!(producer.name, "João Silva");
        assert!(!producer.id.is_empty());
    }

    #[tokio::test]
    async fn test_create_producer_stores_normalized_tax_id() {
        let (_, rules) = rules();
        let producer = rules
            .create_producer(new_producer("11.222.333/0001-81"))
            .await
            .unwrap();

        assert_eq!(producer.tax_id, VALID_CNPJ);
    }

    #[tokio::test]
    async fn test_create_producer_invalid_document() {
        let (store, rules) = rules();
        let err = rules
            .create_producer(new_producer("12345678901"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidDocument { ref tax_id } if tax_id == "12345678901"));
        assert!(store.list_producers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_producer_repeated_digits_rejected() {
        let (_, rules) = rules();
        let err = rules
            .create_producer(new_producer("11111111111"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidDocument);
    }

    #[tokio::test]
    async fn test_create_producer_duplicate_document() {
        let (store, rules) = rules();
        rules.create_producer(new_producer(VALID_CPF)).await.unwrap();

        let err = rules
            .create_producer(new_producer("123.456.789-09"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateDocument);
        assert_eq!(store.list_producers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_producer_lost_race_is_duplicate() {
        let store = Arc::new(RacingStore::default());
        let rules = ProducerRules::new(Arc::clone(&store));
        rules.create_producer(new_producer(VALID_CPF)).await.unwrap();

        let err = rules
            .create_producer(new_producer(VALID_CPF))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateDocument);
    }

    #[tokio::test]
    async fn test_update_producer_name_only() {
        let (_, rules) = rules();
        let producer = rules.create_producer(new_producer(VALID_CPF)).await.unwrap();

        let updated = rules
            .update_producer(ProducerUpdate {
                id: producer.id.clone(),
                name: Some("Maria Souza".to_string()),
                tax_id: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Maria Souza");
        assert_eq!(updated.tax_id, VALID_CPF);
    }

    #[tokio::test]
    async fn test_update_producer_keeping_own_tax_id() {
        let (_, rules) = rules();
        let producer = rules.create_producer(new_producer(VALID_CPF)).await.unwrap();

        let updated = rules
            .update_producer(ProducerUpdate {
                id: producer.id.clone(),
                name: None,
                tax_id: Some("123.456.789-09".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.tax_id, VALID_CPF);
    }

    #[tokio::test]
    async fn test_update_producer_tax_id_taken() {
        let (_, rules) = rules();
        rules.create_producer(new_producer(VALID_CPF)).await.unwrap();
        let other = rules.create_producer(new_producer(OTHER_CPF)).await.unwrap();

        let err = rules
            .update_producer(ProducerUpdate {
                id: other.id.clone(),
                name: None,
                tax_id: Some(VALID_CPF.to_string()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateDocument);
        assert_eq!(rules.find_producer(&other.id).await.unwrap().tax_id, OTHER_CPF);
    }

    #[tokio::test]
    async fn test_update_producer_invalid_document() {
        let (_, rules) = rules();
        let producer = rules.create_producer(new_producer(VALID_CPF)).await.unwrap();

        let err = rules
            .update_producer(ProducerUpdate {
                id: producer.id,
                name: None,
                tax_id: Some("12345678900".to_string()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidDocument);
    }

    #[tokio::test]
    async fn test_update_unknown_producer() {
        let (_, rules) = rules();
        let err = rules
            .update_producer(ProducerUpdate {
                id: "missing".to_string(),
                name: Some("Nobody".to_string()),
                tax_id: Some("not even digits".to_string()),
            })
            .await
            .unwrap_err();

        // Existence is checked before the document
        assert_eq!(err.missing_entity(), Some(EntityKind::Producer));
    }

    #[tokio::test]
    async fn test_update_producer_lost_race_is_duplicate() {
        let store = Arc::new(RacingStore::default());
        let rules = ProducerRules::new(Arc::clone(&store));
        rules.create_producer(new_producer(VALID_CPF)).await.unwrap();
        let other = rules.create_producer(new_producer(OTHER_CPF)).await.unwrap();

        let err = rules
            .update_producer(ProducerUpdate {
                id: other.id,
                name: None,
                tax_id: Some(VALID_CPF.to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::DuplicateDocument { ref tax_id } if tax_id == VALID_CPF));
    }

    #[tokio::test]
    async fn test_delete_producer() {
        let (store, rules) = rules();
        let producer = rules.create_producer(new_producer(VALID_CPF)).await.unwrap();

        rules.delete_producer(&producer.id).await.unwrap();
        assert!(store.find_producer_by_id(&producer.id).await.unwrap().is_none());

        let err = rules.delete_producer(&producer.id).await.unwrap_err();
        assert_eq!(err.missing_entity(), Some(EntityKind::Producer));
    }

    #[tokio::test]
    async fn test_delete_producer_with_farms_passes_store_error_through() {
        let (store, rules) = rules();
        let producer = rules.create_producer(new_producer(VALID_CPF)).await.unwrap();
        FarmRules::new(Arc::clone(&store))
            .create_farm(new_farm(&producer.id, 100, 50, 50))
            .await
            .unwrap();

        let err = rules.delete_producer(&producer.id).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Store(StoreError::ForeignKeyViolation { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::StoreFailure);
    }

    #[tokio::test]
    async fn test_find_and_list_producers() {
        let (_, rules) = rules();
        let b = rules
            .create_producer(NewProducer {
                name: "Beatriz".to_string(),
                tax_id: OTHER_CPF.to_string(),
            })
            .await
            .unwrap();
        rules
            .create_producer(NewProducer {
                name: "Antônio".to_string(),
                tax_id: VALID_CPF.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(rules.find_producer(&b.id).await.unwrap(), b);

        let names: Vec<String> = rules
            .list_producers()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Antônio", "Beatriz"]);

        let err = rules.find_producer("missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_observer_sees_each_operation() {
        let observer = Arc::new(RecordingObserver::default());
        let rules = ProducerRules::new(Arc::new(MemoryStore::new()))
            .with_observer(observer.clone());

        rules.create_producer(new_producer(VALID_CPF)).await.unwrap();
        rules
            .create_producer(new_producer(VALID_CPF))
            .await
            .unwrap_err();

        assert_eq!(
            observer.events(),
            vec![
                "before:create_producer",
                "after:create_producer",
                "before:create_producer",
                "error:create_producer:duplicate_document",
            ]
        );
    }
}
