//! # Season Rules
//!
//! A season is identified by its (name, year) pair.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult, EntityKind};
use crate::observer::{observe, RuleObserver, TracingObserver};
use crate::rules::duplicate_or;
use crate::store::RegistryStore;
use crate::types::{NewSeason, Season};

/// Rule service for seasons.
pub struct SeasonRules<S: ?Sized> {
    store: Arc<S>,
    observer: Arc<dyn RuleObserver>,
}

impl<S: ?Sized> Clone for SeasonRules<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<S: RegistryStore + ?Sized> SeasonRules<S> {
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

    pub async fn create_season(&self, input: NewSeason) -> CoreResult<Season> {
        observe(self.observer.as_ref(), "create_season", self.create(input)).await
    }

    pub async fn find_season(&self, id: &str) -> CoreResult<Season> {
        observe(self.observer.as_ref(), "find_season", async {
            self.store
                .find_season_by_id(id)
                .await?
                .ok_or_else(|| CoreError::not_found(EntityKind::Season, id))
        })
        .await
    }

    async fn create(&self, input: NewSeason) -> CoreResult<Season> {
        let existing = self
            .store
            .find_season_by_name_and_year(&input.name, input.year)
            .await?;
        if existing.is_some() {
            return Err(CoreError::DuplicateSeason {
                name: input.name,
                year: input.year,
            });
        }

        self.store.create_season(&input).await.map_err(|e| {
            duplicate_or(e, || CoreError::DuplicateSeason {
                name: input.name.clone(),
                year: input.year,
            })
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::rules::fixtures::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_create_season() {
        let rules = SeasonRules::new(Arc::new(MemoryStore::new()));
        let season = rules
            .create_season(new_season("Safra 2024/2025", 2024))
            .await
            .unwrap();

        assert!(season.active);
        assert_eq!(rules.find_season(&season.id).await.unwrap(), season);
    }

    #[tokio::test]
    async fn test_same_name_different_year_is_allowed() {
        let rules = SeasonRules::new(Arc::new(MemoryStore::new()));
        rules.create_season(new_season("Safra", 2023)).await.unwrap();
        rules.create_season(new_season("Safra", 2024)).await.unwrap();

        let err = rules
            .create_season(new_season("Safra", 2024))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateSeason);
    }

    #[tokio::test]
    async fn test_duplicate_season_lost_race() {
        let rules = SeasonRules::new(Arc::new(RacingStore::default()));
        rules.create_season(new_season("Safra", 2024)).await.unwrap();

        let err = rules
            .create_season(new_season("Safra", 2024))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateSeason { year: 2024, .. }));
    }

    #[tokio::test]
    async fn test_find_unknown_season() {
        let rules = SeasonRules::new(Arc::new(MemoryStore::new()));
        let err = rules.find_season("missing").await.unwrap_err();
        assert_eq!(err.missing_entity(), Some(EntityKind::Season));
    }
}
