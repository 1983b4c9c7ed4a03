//! # SQLite Registry Store
//!
//! [`RegistryStore`] implementation over the repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  agro-core rules ──► dyn RegistryStore                                  │
//! │                           │                                             │
//! │                           ▼                                             │
//! │                  SqliteRegistryStore                                    │
//! │    producers ── farms ── crops ── seasons ── plantings                  │
//! │        (one repository each, sharing one SqlitePool)                    │
//! │                           │                                             │
//! │                           ▼  DbError → StoreError                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;

use agro_core::{
    Crop, CropIdCount, CropName, Farm, Hectares, LandUsage, NewCrop, NewFarm, NewPlanting,
    NewProducer, NewSeason, Planting, Producer, ProducerUpdate, RegistryStore, Season,
    StateCount, StoreResult,
};

use crate::repository::{
    CropRepository, FarmRepository, PlantingRepository, ProducerRepository, SeasonRepository,
};

/// SQLite-backed registry store.
///
/// ## Usage
/// ```rust,ignore
/// let store = Arc::new(db.registry_store());
/// let rules = ProducerRules::new(Arc::clone(&store));
/// ```
#[derive(Debug, Clone)]
pub struct SqliteRegistryStore {
    producers: ProducerRepository,
    farms: FarmRepository,
    crops: CropRepository,
    seasons: SeasonRepository,
    plantings: PlantingRepository,
}

impl SqliteRegistryStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteRegistryStore {
            producers: ProducerRepository::new(pool.clone()),
            farms: FarmRepository::new(pool.clone()),
            crops: CropRepository::new(pool.clone()),
            seasons: SeasonRepository::new(pool.clone()),
            plantings: PlantingRepository::new(pool),
        }
    }
}

#[async_trait]
impl RegistryStore for SqliteRegistryStore {
    // -------------------------------------------------------------------------
    // Producers
    // -------------------------------------------------------------------------

    async fn find_producer_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Producer>> {
        Ok(self.producers.get_by_tax_id(tax_id).await?)
    }

    async fn find_producer_by_id(&self, id: &str) -> StoreResult<Option<Producer>> {
        Ok(self.producers.get_by_id(id).await?)
    }

    async fn list_producers(&self) -> StoreResult<Vec<Producer>> {
        Ok(self.producers.list().await?)
    }

    async fn create_producer(&self, data: &NewProducer) -> StoreResult<Producer> {
        Ok(self.producers.insert(data).await?)
    }

    async fn update_producer(&self, data: &ProducerUpdate) -> StoreResult<Producer> {
        Ok(self.producers.update(data).await?)
    }

    async fn delete_producer(&self, id: &str) -> StoreResult<()> {
        Ok(self.producers.delete(id).await?)
    }

    // -------------------------------------------------------------------------
    // Farms
    // -------------------------------------------------------------------------

    async fn find_farm_by_id(&self, id: &str) -> StoreResult<Option<Farm>> {
        Ok(self.farms.get_by_id(id).await?)
    }

    async fn create_farm(&self, data: &NewFarm) -> StoreResult<Farm> {
        Ok(self.farms.insert(data).await?)
    }

    async fn count_farms(&self) -> StoreResult<u64> {
        Ok(self.farms.count().await?)
    }

    async fn sum_total_area(&self) -> StoreResult<Hectares> {
        Ok(self.farms.sum_total_area().await?)
    }

    async fn group_farms_by_state(&self) -> StoreResult<Vec<StateCount>> {
        Ok(self.farms.count_by_state().await?)
    }

    async fn group_farms_by_crop_via_plantings(&self) -> StoreResult<Vec<CropIdCount>> {
        Ok(self.plantings.farms_per_crop().await?)
    }

    async fn sum_land_usage(&self) -> StoreResult<LandUsage> {
        Ok(self.farms.land_usage().await?)
    }

    // -------------------------------------------------------------------------
    // Crops
    // -------------------------------------------------------------------------

    async fn find_crop_by_id(&self, id: &str) -> StoreResult<Option<Crop>> {
        Ok(self.crops.get_by_id(id).await?)
    }

    async fn find_crop_by_name(&self, name: &str) -> StoreResult<Option<Crop>> {
        Ok(self.crops.get_by_name(name).await?)
    }

    async fn find_crop_names_by_ids(&self, ids: &[String]) -> StoreResult<Vec<CropName>> {
        Ok(self.crops.names_by_ids(ids).await?)
    }

    async fn list_crops(&self) -> StoreResult<Vec<Crop>> {
        Ok(self.crops.list().await?)
    }

    async fn create_crop(&self, data: &NewCrop) -> StoreResult<Crop> {
        Ok(self.crops.insert(data).await?)
    }

    // -------------------------------------------------------------------------
    // Seasons
    // -------------------------------------------------------------------------

    async fn find_season_by_id(&self, id: &str) -> StoreResult<Option<Season>> {
        Ok(self.seasons.get_by_id(id).await?)
    }

    async fn find_season_by_name_and_year(
        &self,
        name: &str,
        year: i32,
    ) -> StoreResult<Option<Season>> {
        Ok(self.seasons.get_by_name_and_year(name, year).await?)
    }

    async fn create_season(&self, data: &NewSeason) -> StoreResult<Season> {
        Ok(self.seasons.insert(data).await?)
    }

    // -------------------------------------------------------------------------
    // Plantings
    // -------------------------------------------------------------------------

    async fn find_planting_by_farm_season_crop(
        &self,
        farm_id: &str,
        season_id: &str,
        crop_id: &str,
    ) -> StoreResult<Option<Planting>> {
        Ok(self
            .plantings
            .get_by_farm_season_crop(farm_id, season_id, crop_id)
            .await?)
    }

    async fn create_planting(&self, data: &NewPlanting) -> StoreResult<Planting> {
        Ok(self.plantings.insert(data).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
// End-to-end: rules from agro-core running against real SQLite.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Database, DbConfig};
    use agro_core::{
        CoreError, CropRules, DashboardAggregator, EntityKind, ErrorKind, FarmRules,
        PlantingRules, ProducerRules, SeasonRules, StoreError,
    };
    use chrono::NaiveDate;

    async fn store() -> Arc<SqliteRegistryStore> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Arc::new(db.registry_store())
    }

    fn new_producer(tax_id: &str) -> NewProducer {
        NewProducer {
            name: "João Silva".to_string(),
            tax_id: tax_id.to_string(),
        }
    }

    fn new_farm(producer_id: &str, total: i64, arable: i64, vegetation: i64) -> NewFarm {
        NewFarm {
            name: "Fazenda Boa Vista".to_string(),
            city: "Campinas".to_string(),
            state: "SP".to_string(),
            total_area: Hectares::from_whole(total),
            arable_area: Hectares::from_whole(arable),
            vegetation_area: Hectares::from_whole(vegetation),
            producer_id: producer_id.to_string(),
        }
    }

    fn new_planting(farm_id: &str, season_id: &str, crop_id: &str, area: i64) -> NewPlanting {
        NewPlanting {
            planted_area: Hectares::from_whole(area),
            planting_date: None,
            expected_harvest_date: None,
            notes: None,
            farm_id: farm_id.to_string(),
            season_id: season_id.to_string(),
            crop_id: crop_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_producer_keeps_one_record() {
        let store = store().await;
        let rules = ProducerRules::new(Arc::clone(&store));

        rules.create_producer(new_producer("12345678909")).await.unwrap();
        let err = rules
            .create_producer(new_producer("123.456.789-09"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateDocument);
        assert_eq!(rules.list_producers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_producer_with_farms_is_store_failure() {
        let store = store().await;
        let producer = ProducerRules::new(Arc::clone(&store))
            .create_producer(new_producer("52998224725"))
            .await
            .unwrap();
        FarmRules::new(Arc::clone(&store))
            .create_farm(new_farm(&producer.id, 100, 50, 50))
            .await
            .unwrap();

        let err = ProducerRules::new(Arc::clone(&store))
            .delete_producer(&producer.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Store(StoreError::ForeignKeyViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_producer_checked_before_areas() {
        let store = store().await;
        let err = FarmRules::new(store)
            .create_farm(new_farm("missing", 10, 600, 300))
            .await
            .unwrap_err();

        assert_eq!(err.missing_entity(), Some(EntityKind::Producer));
    }

    #[tokio::test]
    async fn test_full_flow_to_dashboard() {
        let store = store().await;

        let producer = ProducerRules::new(Arc::clone(&store))
            .create_producer(new_producer("11.222.333/0001-81"))
            .await
            .unwrap();
        let farm = FarmRules::new(Arc::clone(&store))
            .create_farm(new_farm(&producer.id, 1000, 600, 400))
            .await
            .unwrap();
        let season = SeasonRules::new(Arc::clone(&store))
            .create_season(NewSeason {
                name: "Safra 2024/2025".to_string(),
                year: 2024,
                start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
                active: true,
            })
            .await
            .unwrap();

        let crops = CropRules::new(Arc::clone(&store));
        let soja = crops
            .create_crop(NewCrop {
                name: "Soja".to_string(),
                description: None,
                category: None,
            })
            .await
            .unwrap();
        let milho = crops
            .create_crop(NewCrop {
                name: "Milho".to_string(),
                description: None,
                category: None,
            })
            .await
            .unwrap();

        let plantings = PlantingRules::new(Arc::clone(&store));
        plantings
            .create_planting(new_planting(&farm.id, &season.id, &soja.id, 300))
            .await
            .unwrap();
        plantings
            .create_planting(new_planting(&farm.id, &season.id, &milho.id, 200))
            .await
            .unwrap();

        let err = plantings
            .create_planting(new_planting(&farm.id, &season.id, &soja.id, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicatePlanting);

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
        let crops: Vec<(&str, u64)> = snapshot
            .farms_by_crop
            .iter()
            .map(|c| (c.crop_name.as_str(), c.count))
            .collect();
        assert_eq!(crops, vec![("Milho", 1), ("Soja", 1)]);
        assert_eq!(snapshot.land_usage.arable_total, Hectares::from_whole(600));
        assert_eq!(snapshot.land_usage.vegetation_total, Hectares::from_whole(400));
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let snapshot = DashboardAggregator::new(store().await)
            .build_snapshot()
            .await
            .unwrap();

        assert_eq!(snapshot.total_farms, 0);
        assert_eq!(snapshot.total_hectares, Hectares::zero());
        assert!(snapshot.farms_by_state.is_empty());
        assert!(snapshot.farms_by_crop.is_empty());
        assert_eq!(snapshot.land_usage, LandUsage::default());
    }
}
