//! # Planting Rules
//!
//! A planting records one crop grown on one farm during one season. The
//! referenced crop, season and farm are checked in that order, then the
//! (farm, season, crop) triple must not already be registered.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult, EntityKind};
use crate::observer::{observe, RuleObserver, TracingObserver};
use crate::rules::duplicate_or;
use crate::store::RegistryStore;
use crate::types::{NewPlanting, Planting};

/// Rule service for plantings.
pub struct PlantingRules<S: ?Sized> {
    store: Arc<S>,
    observer: Arc<dyn RuleObserver>,
}

impl<S: ?Sized> Clone for PlantingRules<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<S: RegistryStore + ?Sized> PlantingRules<S> {
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

    /// Registers a planting.
    ///
    /// ## Errors
    /// - `NotFound(crop | season | farm)`, first missing one wins
    /// - `DuplicatePlanting` if the triple is taken, whatever the area
    pub async fn create_planting(&self, input: NewPlanting) -> CoreResult<Planting> {
        observe(self.observer.as_ref(), "create_planting", self.create(input)).await
    }

    async fn create(&self, input: NewPlanting) -> CoreResult<Planting> {
        if self.store.find_crop_by_id(&input.crop_id).await?.is_none() {
            return Err(CoreError::not_found(EntityKind::Crop, input.crop_id));
        }

        if self.store.find_season_by_id(&input.season_id).await?.is_none() {
            return Err(CoreError::not_found(EntityKind::Season, input.season_id));
        }

        if self.store.find_farm_by_id(&input.farm_id).await?.is_none() {
            return Err(CoreError::not_found(EntityKind::Farm, input.farm_id));
        }

        let existing = self
            .store
            .find_planting_by_farm_season_crop(&input.farm_id, &input.season_id, &input.crop_id)
            .await?;
        if existing.is_some() {
            return Err(duplicate_planting(&input));
        }

        self.store
            .create_planting(&input)
            .await
            .map_err(|e| duplicate_or(e, || duplicate_planting(&input)))
    }
}

fn duplicate_planting(input: &NewPlanting) -> CoreError {
    CoreError::DuplicatePlanting {
        farm_id: input.farm_id.clone(),
        season_id: input.season_id.clone(),
        crop_id: input.crop_id.clone(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
