//! # Registry Store
//!
//! The persistence contract the rule services depend on.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ProducerRules / FarmRules / PlantingRules / DashboardAggregator       │
//! │       │                                                                 │
//! │       │  store.find_producer_by_tax_id("52998224725")                  │
//! │       ▼                                                                 │
//! │  dyn RegistryStore  (this trait)                                       │
//! │       │                                                                 │
//! │       ├── MemoryStore          (this crate, tests & embedding)         │
//! │       └── SqliteRegistryStore  (agro-db)                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! - `find_*` return `Ok(None)` for a missing row, never an error.
//! - `create_*` assign `id` and timestamps.
//! - Implementations that enforce uniqueness report a rejected write as
//!   [`StoreError::UniqueViolation`]; the rules translate it into the
//!   matching duplicate error.
//! - `group_*` results are sorted by count, descending.

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::hectares::Hectares;
use crate::types::{
    Crop, CropIdCount, CropName, Farm, LandUsage, NewCrop, NewFarm, NewPlanting, NewProducer,
    NewSeason, Planting, Producer, ProducerUpdate, Season, StateCount,
};

pub use memory::MemoryStore;

/// Storage backend for the registry.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    // -------------------------------------------------------------------------
    // Producers
    // -------------------------------------------------------------------------

    /// Looks a producer up by normalized (digits-only) tax ID.
    async fn find_producer_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Producer>>;

    async fn find_producer_by_id(&self, id: &str) -> StoreResult<Option<Producer>>;

    async fn list_producers(&self) -> StoreResult<Vec<Producer>>;

    async fn create_producer(&self, data: &NewProducer) -> StoreResult<Producer>;

    /// Applies the `Some` fields of `data` and returns the updated row.
    async fn update_producer(&self, data: &ProducerUpdate) -> StoreResult<Producer>;

    async fn delete_producer(&self, id: &str) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Farms
    // -------------------------------------------------------------------------

    async fn find_farm_by_id(&self, id: &str) -> StoreResult<Option<Farm>>;

    async fn create_farm(&self, data: &NewFarm) -> StoreResult<Farm>;

    async fn count_farms(&self) -> StoreResult<u64>;

    /// Sum of every farm's total area; zero when there are no farms.
    async fn sum_total_area(&self) -> StoreResult<Hectares>;

    async fn group_farms_by_state(&self) -> StoreResult<Vec<StateCount>>;

    /// Distinct farms per crop, counted through plantings.
    async fn group_farms_by_crop_via_plantings(&self) -> StoreResult<Vec<CropIdCount>>;

    async fn sum_land_usage(&self) -> StoreResult<LandUsage>;

    // -------------------------------------------------------------------------
    // Crops
    // -------------------------------------------------------------------------

    async fn find_crop_by_id(&self, id: &str) -> StoreResult<Option<Crop>>;

    async fn find_crop_by_name(&self, name: &str) -> StoreResult<Option<Crop>>;

    /// Names for the given IDs. Unknown IDs are simply absent from the result.
    async fn find_crop_names_by_ids(&self, ids: &[String]) -> StoreResult<Vec<CropName>>;

    async fn list_crops(&self) -> StoreResult<Vec<Crop>>;

    async fn create_crop(&self, data: &NewCrop) -> StoreResult<Crop>;

    // -------------------------------------------------------------------------
    // Seasons
    // -------------------------------------------------------------------------

    async fn find_season_by_id(&self, id: &str) -> StoreResult<Option<Season>>;

    async fn find_season_by_name_and_year(
        &self,
        name: &str,
        year: i32,
    ) -> StoreResult<Option<Season>>;

    async fn create_season(&self, data: &NewSeason) -> StoreResult<Season>;

    // -------------------------------------------------------------------------
    // Plantings
    // -------------------------------------------------------------------------

    async fn find_planting_by_farm_season_crop(
        &self,
        farm_id: &str,
        season_id: &str,
        crop_id: &str,
    ) -> StoreResult<Option<Planting>>;

    async fn create_planting(&self, data: &NewPlanting) -> StoreResult<Planting>;
}
