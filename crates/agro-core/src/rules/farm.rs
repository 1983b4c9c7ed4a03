//! # Farm Rules
//!
//! A farm can only be registered for an existing producer, and its arable
//! and vegetation areas must fit inside its total area. The producer check
//! always runs first, so an unknown producer is reported even when the areas
//! are also wrong.

use std::sync::Arc;

use crate::area::valid_farm_areas;
use crate::error::{CoreError, CoreResult, EntityKind};
use crate::observer::{observe, RuleObserver, TracingObserver};
use crate::store::RegistryStore;
use crate::types::{Farm, NewFarm};

/// Rule service for farms.
pub struct FarmRules<S: ?Sized> {
    store: Arc<S>,
    observer: Arc<dyn RuleObserver>,
}

impl<S: ?Sized> Clone for FarmRules<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<S: RegistryStore + ?Sized> FarmRules<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RuleObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Registers a farm.
    ///
    /// ## Errors
    /// - `NotFound(producer)` if `producer_id` is unknown
    /// - `InvalidAreas` if arable + vegetation exceeds total
    pub async fn create_farm(&self, input: NewFarm) -> CoreResult<Farm> {
        observe(self.observer.as_ref(), "create_farm", self.create(input)).await
    }

    pub async fn find_farm(&self, id: &str) -> CoreResult<Farm> {
        observe(self.observer.as_ref(), "find_farm", async {
            self.store
                .find_farm_by_id(id)
                .await?
                .ok_or_else(|| CoreError::not_found(EntityKind::Farm, id))
        })
        .await
    }

    pub async fn count_farms(&self) -> CoreResult<u64> {
        observe(self.observer.as_ref(), "count_farms", async {
            self.store.count_farms().await.map_err(CoreError::from)
        })
        .await
    }

    async fn create(&self, input: NewFarm) -> CoreResult<Farm> {
        if self
            .store
            .find_producer_by_id(&input.producer_id)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found(
                EntityKind::Producer,
                input.producer_id,
            ));
        }

        if !valid_farm_areas(input.total_area, input.arable_area, input.vegetation_area) {
            return Err(CoreError::InvalidAreas {
                total: input.total_area,
                arable: input.arable_area,
                vegetation: input.vegetation_area,
            });
        }

        Ok(self.store.create_farm(&input).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
