//! # Dashboard Aggregator
//!
//! Builds a [`DashboardSnapshot`] from five independent store queries.
//!
//! ## Query Fan-out
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  build_snapshot()                                                       │
//! │     │                                                                   │
//! │     ├── count_farms ─────────────────────────────► total_farms          │
//! │     ├── sum_total_area ──────────────────────────► total_hectares       │
//! │     ├── group_farms_by_state ────────────────────► farms_by_state       │
//! │     ├── group_farms_by_crop_via_plantings                               │
//! │     │        └── find_crop_names_by_ids ─────────► farms_by_crop        │
//! │     └── sum_land_usage ──────────────────────────► land_usage           │
//! │                                                                         │
//! │  All five run concurrently (try_join!). The first error aborts the      │
//! │  snapshot and drops the queries still in flight.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is cached; every call reflects the store at that moment.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::try_join;

use crate::error::{CoreResult, StoreResult};
use crate::observer::{observe, RuleObserver, TracingObserver};
use crate::store::RegistryStore;
use crate::types::{CropCount, DashboardSnapshot, StateCount};

/// Label used when a planting references a crop that no longer resolves.
pub const UNKNOWN_CROP_LABEL: &str = "Unknown crop";

/// Read-only aggregation over the registry.
pub struct DashboardAggregator<S: ?Sized> {
    store: Arc<S>,
    observer: Arc<dyn RuleObserver>,
}

impl<S: ?Sized> Clone for DashboardAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<S: RegistryStore + ?Sized> DashboardAggregator<S> {
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

    /// Computes the current snapshot.
    ///
    /// Both group lists are sorted by count descending; ties are ordered by
    /// state code or crop name so the output is deterministic.
    pub async fn build_snapshot(&self) -> CoreResult<DashboardSnapshot> {
        observe(self.observer.as_ref(), "build_snapshot", self.collect()).await
    }

    async fn collect(&self) -> CoreResult<DashboardSnapshot> {
        let store = self.store.as_ref();

        let (total_farms, total_hectares, mut farms_by_state, farms_by_crop, land_usage) = try_join!(
            store.count_farms(),
            store.sum_total_area(),
            store.group_farms_by_state(),
            farms_by_crop(store),
            store.sum_land_usage(),
        )?;

        sort_states(&mut farms_by_state);

        Ok(DashboardSnapshot {
            total_farms,
            total_hectares,
            farms_by_state,
            farms_by_crop,
            land_usage,
        })
    }
}

/// Farms per crop with crop IDs resolved to names.
async fn farms_by_crop<S: RegistryStore + ?Sized>(store: &S) -> StoreResult<Vec<CropCount>> {
    let groups = store.group_farms_by_crop_via_plantings().await?;
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = groups.iter().map(|g| g.crop_id.clone()).collect();
    let names: HashMap<String, String> = store
        .find_crop_names_by_ids(&ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut counts: Vec<CropCount> = groups
        .into_iter()
        .map(|g| CropCount {
            crop_name: names
                .get(&g.crop_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_CROP_LABEL.to_string()),
            count: g.count,
        })
        .collect();

    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.crop_name.cmp(&b.crop_name))
    });
    Ok(counts)
}

fn sort_states(groups: &mut [StateCount]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.state.cmp(&b.state)));
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::{CoreError, ErrorKind, StoreError};
    use crate::hectares::Hectares;
    use crate::observer::tests::RecordingObserver;
    use crate::rules::fixtures::*;
    use crate::rules::{CropRules, FarmRules, PlantingRules, ProducerRules, SeasonRules};
    use crate::store::MemoryStore;
    use crate::types::*;

    #[tokio::test]
    async fn test_empty_store() {
        let snapshot = DashboardAggregator::new(Arc::new(MemoryStore::new()))
            .build_snapshot()
            .await
            .unwrap();

        assert_eq!(snapshot.total_farms, 0);
        assert_eq!(snapshot.total_hectares, Hectares::zero());
        assert!(snapshot.farms_by_state.is_empty());
        assert!(snapshot.farms_by_crop.is_empty());
        assert_eq!(snapshot.land_usage, LandUsage::default());
    }

    #[tokio::test]
    async fn test_single_farm_with_two_crops() {
        let store = Arc::new(MemoryStore::new());
        let producer = ProducerRules::new(Arc::clone(&store))
            .create_producer(new_producer(VALID_CPF))
            .await
            .unwrap();
        let farm = FarmRules::new(Arc::clone(&store))
            .create_farm(new_farm(&producer.id, 1000, 600, 400))
            .await
            .unwrap();
        let season = SeasonRules::new(Arc::clone(&store))
            .create_season(new_season("Safra 2024/2025", 2024))
            .await
            .unwrap();
        let crops = CropRules::new(Arc::clone(&store));
        let soja = crops.create_crop(new_crop("Soja")).await.unwrap();
        let milho = crops.create_crop(new_crop("Milho")).await.unwrap();

        let plantings = PlantingRules::new(Arc::clone(&store));
        plantings
            .create_planting(new_planting(&farm.id, &season.id, &soja.id, 300))
            .await
            .unwrap();
        plantings
            .create_planting(new_planting(&farm.id, &season.id, &milho.id, 200))
            .await
            .unwrap();

        let snapshot = DashboardAggregator::new(store).build_snapshot().await.unwrap();

        assert_eq!(snapshot.total_farms, 1);
        assert_eq!(snapshot.total_hectares, Hectares::from_whole(1000));
        assert_eq!(
            snapshot.farms_by_state,
            vec![StateCount {
                state: "SP".to_string(),
                count: 1
            }]
        );
        assert_eq!(
            snapshot.farms_by_crop,
            vec![
                CropCount {
                    crop_name: "Milho".to_string(),
                    count: 1
                },
                CropCount {
                    crop_name: "Soja".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(snapshot.land_usage.arable_total, Hectares::from_whole(600));
        assert_eq!(snapshot.land_usage.vegetation_total, Hectares::from_whole(400));
    }

    #[tokio::test]
    async fn test_crop_counts_distinct_farms_across_seasons() {
        let store = Arc::new(MemoryStore::new());
        let producer = ProducerRules::new(Arc::clone(&store))
            .create_producer(new_producer(VALID_CPF))
            .await
            .unwrap();
        let farms = FarmRules::new(Arc::clone(&store));
        let a = farms.create_farm(new_farm(&producer.id, 100, 50, 50)).await.unwrap();
        let b = farms.create_farm(new_farm(&producer.id, 100, 50, 50)).await.unwrap();
        let seasons = SeasonRules::new(Arc::clone(&store));
        let s1 = seasons.create_season(new_season("Safra", 2023)).await.unwrap();
        let s2 = seasons.create_season(new_season("Safra", 2024)).await.unwrap();
        let soja = CropRules::new(Arc::clone(&store))
            .create_crop(new_crop("Soja"))
            .await
            .unwrap();

        let plantings = PlantingRules::new(Arc::clone(&store));
        for (farm, season) in [(&a, &s1), (&a, &s2), (&b, &s1)] {
            plantings
                .create_planting(new_planting(&farm.id, &season.id, &soja.id, 10))
                .await
                .unwrap();
        }

        let snapshot = DashboardAggregator::new(store).build_snapshot().await.unwrap();
        assert_eq!(snapshot.farms_by_crop.len(), 1);
        assert_eq!(snapshot.farms_by_crop[0].count, 2);
    }

    #[tokio::test]
    async fn test_states_sorted_by_count_then_code() {
        let store = Arc::new(MemoryStore::new());
        let producer = ProducerRules::new(Arc::clone(&store))
            .create_producer(new_producer(VALID_CPF))
            .await
            .unwrap();
        let farms = FarmRules::new(Arc::clone(&store));
        for state in ["MG", "SP", "GO", "SP"] {
            let mut input = new_farm(&producer.id, 100, 10, 10);
            input.state = state.to_string();
            farms.create_farm(input).await.unwrap();
        }

        let snapshot = DashboardAggregator::new(store).build_snapshot().await.unwrap();
        let states: Vec<(&str, u64)> = snapshot
            .farms_by_state
            .iter()
            .map(|s| (s.state.as_str(), s.count))
            .collect();
        assert_eq!(states, vec![("SP", 2), ("GO", 1), ("MG", 1)]);
        assert_eq!(snapshot.total_hectares, Hectares::from_whole(400));
    }

    // -------------------------------------------------------------------------
    // Scripted store
    // -------------------------------------------------------------------------

    /// Returns fixed aggregate rows; optionally fails one query.
    #[derive(Default)]
    struct ScriptedStore {
        crop_groups: Vec<CropIdCount>,
        crop_names: Vec<CropName>,
        fail_land_usage: bool,
    }

    #[async_trait]
    impl RegistryStore for ScriptedStore {
        async fn find_producer_by_tax_id(&self, _: &str) -> StoreResult<Option<Producer>> {
            Ok(None)
        }
        async fn find_producer_by_id(&self, _: &str) -> StoreResult<Option<Producer>> {
            Ok(None)
        }
        async fn list_producers(&self) -> StoreResult<Vec<Producer>> {
            Ok(Vec::new())
        }
        async fn create_producer(&self, _: &NewProducer) -> StoreResult<Producer> {
            unimplemented!()
        }
        async fn update_producer(&self, _: &ProducerUpdate) -> StoreResult<Producer> {
            unimplemented!()
        }
        async fn delete_producer(&self, _: &str) -> StoreResult<()> {
            unimplemented!()
        }
        async fn find_farm_by_id(&self, _: &str) -> StoreResult<Option<Farm>> {
            Ok(None)
        }
        async fn create_farm(&self, _: &NewFarm) -> StoreResult<Farm> {
            unimplemented!()
        }
        async fn count_farms(&self) -> StoreResult<u64> {
            Ok(3)
        }
        async fn sum_total_area(&self) -> StoreResult<Hectares> {
            Ok(Hectares::from_hundredths(130_075))
        }
        async fn group_farms_by_state(&self) -> StoreResult<Vec<StateCount>> {
            Ok(Vec::new())
        }
        async fn group_farms_by_crop_via_plantings(&self) -> StoreResult<Vec<CropIdCount>> {
            Ok(self.crop_groups.clone())
        }
        async fn sum_land_usage(&self) -> StoreResult<LandUsage> {
            if self.fail_land_usage {
                return Err(StoreError::Backend("connection reset".into()));
            }
            Ok(LandUsage::default())
        }
        async fn find_crop_by_id(&self, _: &str) -> StoreResult<Option<Crop>> {
            Ok(None)
        }
        async fn find_crop_by_name(&self, _: &str) -> StoreResult<Option<Crop>> {
            Ok(None)
        }
        async fn find_crop_names_by_ids(&self, ids: &[String]) -> StoreResult<Vec<CropName>> {
            Ok(self
                .crop_names
                .iter()
                .filter(|c| ids.contains(&c.id))
                .cloned()
                .collect())
        }
        async fn list_crops(&self) -> StoreResult<Vec<Crop>> {
            Ok(Vec::new())
        }
        async fn create_crop(&self, _: &NewCrop) -> StoreResult<Crop> {
            unimplemented!()
        }
        async fn find_season_by_id(&self, _: &str) -> StoreResult<Option<Season>> {
            Ok(None)
        }
        async fn find_season_by_name_and_year(
            &self,
            _: &str,
            _: i32,
        ) -> StoreResult<Option<Season>> {
            Ok(None)
        }
        async fn create_season(&self, _: &NewSeason) -> StoreResult<Season> {
            unimplemented!()
        }
        async fn find_planting_by_farm_season_crop(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> StoreResult<Option<Planting>> {
            Ok(None)
        }
        async fn create_planting(&self, _: &NewPlanting) -> StoreResult<Planting> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_unresolved_crop_gets_unknown_label() {
        let store = ScriptedStore {
            crop_groups: vec![
                CropIdCount {
                    crop_id: "gone".to_string(),
                    count: 4,
                },
                CropIdCount {
                    crop_id: "soja".to_string(),
                    count: 2,
                },
            ],
            crop_names: vec![CropName {
                id: "soja".to_string(),
                name: "Soja".to_string(),
            }],
            ..Default::default()
        };

        let snapshot = DashboardAggregator::new(Arc::new(store))
            .build_snapshot()
            .await
            .unwrap();

        assert_eq!(snapshot.total_farms, 3);
        assert_eq!(snapshot.total_hectares, Hectares::from_hundredths(130_075));
        assert_eq!(snapshot.farms_by_crop[0].crop_name, UNKNOWN_CROP_LABEL);
        assert_eq!(snapshot.farms_by_crop[0].count, 4);
        assert_eq!(snapshot.farms_by_crop[1].crop_name, "Soja");
    }

    #[tokio::test]
    async fn test_first_failing_query_aborts_snapshot() {
        let store = ScriptedStore {
            fail_land_usage: true,
            ..Default::default()
        };
        let observer = Arc::new(RecordingObserver::default());

        let err = DashboardAggregator::new(Arc::new(store))
            .with_observer(observer.clone())
            .build_snapshot()
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Store(StoreError::Backend(_))));
        assert_eq!(err.kind(), ErrorKind::StoreFailure);
        assert_eq!(
            observer.events(),
            vec!["before:build_snapshot", "error:build_snapshot:store_failure"]
        );
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let store: Arc<dyn RegistryStore> = Arc::new(MemoryStore::new());
        let snapshot = DashboardAggregator::new(store).build_snapshot().await.unwrap();
        assert_eq!(snapshot.total_farms, 0);
    }
}
