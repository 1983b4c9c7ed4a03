//! # Crop Rules
//!
//! Crop names are unique across the registry.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult, EntityKind};
use crate::observer::{observe, RuleObserver, TracingObserver};
use crate::rules::duplicate_or;
use crate::store::RegistryStore;
use crate::types::{Crop, NewCrop};

/// Rule service for crops.
pub struct CropRules<S: ?Sized> {
    store: Arc<S>,
    observer: Arc<dyn RuleObserver>,
}

impl<S: ?Sized> Clone for CropRules<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<S: RegistryStore + ?Sized> CropRules<S> {
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

    pub async fn create_crop(&self, input: NewCrop) -> CoreResult<Crop> {
        observe(self.observer.as_ref(), "create_crop", self.create(input)).await
    }

    pub async fn find_crop(&self, id: &str) -> CoreResult<Crop> {
        observe(self.observer.as_ref(), "find_crop", async {
            self.store
                .find_crop_by_id(id)
                .await?
                .ok_or_else(|| CoreError::not_found(EntityKind::Crop, id))
        })
        .await
    }

    /// All crops, ordered by name.
    pub async fn list_crops(&self) -> CoreResult<Vec<Crop>> {
        observe(self.observer.as_ref(), "list_crops", async {
            self.store.list_crops().await.map_err(CoreError::from)
        })
        .await
    }

    async fn create(&self, input: NewCrop) -> CoreResult<Crop> {
        if self.store.find_crop_by_name(&input.name).await?.is_some() {
            return Err(CoreError::DuplicateCrop { name: input.name });
        }

        self.store.create_crop(&input).await.map_err(|e| {
            duplicate_or(e, || CoreError::DuplicateCrop {
                name: input.name.clone(),
            })
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
