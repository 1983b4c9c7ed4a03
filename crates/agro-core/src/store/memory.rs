//! In-memory [`RegistryStore`].
//!
//! Enforces the same UNIQUE and foreign key constraints as the SQLite schema
//! so rules behave identically against either backend. Used by the test
//! suites and by embedders that don't need durability.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::RegistryStore;
use crate::error::{StoreError, StoreResult};
use crate::hectares::Hectares;
use crate::types::{
    Crop, CropIdCount, CropName, Farm, LandUsage, NewCrop, NewFarm, NewPlanting, NewProducer,
    NewSeason, Planting, Producer, ProducerUpdate, Season, StateCount,
};

#[derive(Debug, Default)]
struct Tables {
    producers: Vec<Producer>,
    farms: Vec<Farm>,
    crops: Vec<Crop>,
    seasons: Vec<Season>,
    plantings: Vec<Planting>,
}

/// A `RegistryStore` backed by vectors behind one mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn foreign_key(message: impl Into<String>) -> StoreError {
    StoreError::ForeignKeyViolation {
        message: message.into(),
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn find_producer_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Producer>> {
        let tables = self.tables()?;
        Ok(tables.producers.iter().find(|p| p.tax_id == tax_id).cloned())
    }

    async fn find_producer_by_id(&self, id: &str) -> StoreResult<Option<Producer>> {
        let tables = self.tables()?;
        Ok(tables.producers.iter().find(|p| p.id == id).cloned())
    }

    async fn list_producers(&self) -> StoreResult<Vec<Producer>> {
        let tables = self.tables()?;
        let mut producers = tables.producers.clone();
        producers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(producers)
    }

    async fn create_producer(&self, data: &NewProducer) -> StoreResult<Producer> {
        let mut tables = self.tables()?;

        if tables.producers.iter().any(|p| p.tax_id == data.tax_id) {
            return Err(StoreError::unique("producers.tax_id"));
        }

        let now = Utc::now();
        let producer = Producer {
            id: new_id(),
            tax_id: data.tax_id.clone(),
            name: data.name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.producers.push(producer.clone());
        Ok(producer)
    }

    async fn update_producer(&self, data: &ProducerUpdate) -> StoreResult<Producer> {
        let mut tables = self.tables()?;

        if let Some(tax_id) = &data.tax_id {
            if tables
                .producers
                .iter()
                .any(|p| &p.tax_id == tax_id && p.id != data.id)
            {
                return Err(StoreError::unique("producers.tax_id"));
            }
        }

        let producer = tables
            .producers
            .iter_mut()
            .find(|p| p.id == data.id)
            .ok_or_else(|| StoreError::Backend(format!("producer not found: {}", data.id).into()))?;

        if let Some(name) = &data.name {
            producer.name = name.clone();
        }
        if let Some(tax_id) = &data.tax_id {
            producer.tax_id = tax_id.clone();
        }
        producer.updated_at = Utc::now();

        Ok(producer.clone())
    }

    async fn delete_producer(&self, id: &str) -> StoreResult<()> {
        let mut tables = self.tables()?;

        if tables.farms.iter().any(|f| f.producer_id == id) {
            return Err(foreign_key("producer still owns farms"));
        }

        tables.producers.retain(|p| p.id != id);
        Ok(())
    }

    async fn find_farm_by_id(&self, id: &str) -> StoreResult<Option<Farm>> {
        let tables = self.tables()?;
        Ok(tables.farms.iter().find(|f| f.id == id).cloned())
    }

    async fn create_farm(&self, data: &NewFarm) -> StoreResult<Farm> {
        let mut tables = self.tables()?;

        if !tables.producers.iter().any(|p| p.id == data.producer_id) {
            return Err(foreign_key("farms.producer_id references a missing producer"));
        }

        let now = Utc::now();
        let farm = Farm {
            id: new_id(),
            name: data.name.clone(),
            city: data.city.clone(),
            state: data.state.clone(),
            total_area: data.total_area,
            arable_area: data.arable_area,
            vegetation_area: data.vegetation_area,
            producer_id: data.producer_id.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.farms.push(farm.clone());
        Ok(farm)
    }

    async fn count_farms(&self) -> StoreResult<u64> {
        let tables = self.tables()?;
        Ok(tables.farms.len() as u64)
    }

    async fn sum_total_area(&self) -> StoreResult<Hectares> {
        let tables = self.tables()?;
        Ok(tables.farms.iter().map(|f| f.total_area).sum())
    }

    async fn group_farms_by_state(&self) -> StoreResult<Vec<StateCount>> {
        let tables = self.tables()?;

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for farm in &tables.farms {
            *counts.entry(farm.state.as_str()).or_default() += 1;
        }

        let mut groups: Vec<StateCount> = counts
            .into_iter()
            .map(|(state, count)| StateCount {
                state: state.to_string(),
                count,
            })
            .collect();
        groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.state.cmp(&b.state)));
        Ok(groups)
    }

    async fn group_farms_by_crop_via_plantings(&self) -> StoreResult<Vec<CropIdCount>> {
        let tables = self.tables()?;

        let mut farms_per_crop: HashMap<&str, HashSet<&str>> = HashMap::new();
        for planting in &tables.plantings {
            farms_per_crop
                .entry(planting.crop_id.as_str())
                .or_default()
                .insert(planting.farm_id.as_str());
        }

        let mut groups: Vec<CropIdCount> = farms_per_crop
            .into_iter()
            .map(|(crop_id, farms)| CropIdCount {
                crop_id: crop_id.to_string(),
                count: farms.len() as u64,
            })
            .collect();
        groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.crop_id.cmp(&b.crop_id)));
        Ok(groups)
    }

    async fn sum_land_usage(&self) -> StoreResult<LandUsage> {
        let tables = self.tables()?;
        Ok(LandUsage {
            arable_total: tables.farms.iter().map(|f| f.arable_area).sum(),
            vegetation_total: tables.farms.iter().map(|f| f.vegetation_area).sum(),
        })
    }

    async fn find_crop_by_id(&self, id: &str) -> StoreResult<Option<Crop>> {
        let tables = self.tables()?;
        Ok(tables.crops.iter().find(|c| c.id == id).cloned())
    }

    async fn find_crop_by_name(&self, name: &str) -> StoreResult<Option<Crop>> {
        let tables = self.tables()?;
        Ok(tables.crops.iter().find(|c| c.name == name).cloned())
    }

    async fn find_crop_names_by_ids(&self, ids: &[String]) -> StoreResult<Vec<CropName>> {
        let tables = self.tables()?;
        Ok(tables
            .crops
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| CropName {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect())
    }

    async fn list_crops(&self) -> StoreResult<Vec<Crop>> {
        let tables = self.tables()?;
        let mut crops = tables.crops.clone();
        crops.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(crops)
    }

    async fn create_crop(&self, data: &NewCrop) -> StoreResult<Crop> {
        let mut tables = self.tables()?;

        if tables.crops.iter().any(|c| c.name == data.name) {
            return Err(StoreError::unique("crops.name"));
        }

        let crop = Crop {
            id: new_id(),
            name: data.name.clone(),
            description: data.description.clone(),
            category: data.category.clone(),
        };
        tables.crops.push(crop.clone());
        Ok(crop)
    }

    async fn find_season_by_id(&self, id: &str) -> StoreResult<Option<Season>> {
        let tables = self.tables()?;
        Ok(tables.seasons.iter().find(|s| s.id == id).cloned())
    }

    async fn find_season_by_name_and_year(
        &self,
        name: &str,
        year: i32,
    ) -> StoreResult<Option<Season>> {
        let tables = self.tables()?;
        Ok(tables
            .seasons
            .iter()
            .find(|s| s.name == name && s.year == year)
            .cloned())
    }

    async fn create_season(&self, data: &NewSeason) -> StoreResult<Season> {
        let mut tables = self.tables()?;

        if tables
            .seasons
            .iter()
            .any(|s| s.name == data.name && s.year == data.year)
        {
            return Err(StoreError::unique("seasons.name, seasons.year"));
        }

        let season = Season {
            id: new_id(),
            name: data.name.clone(),
            year: data.year,
            start_date: data.start_date,
            end_date: data.end_date,
            active: data.active,
        };
        tables.seasons.push(season.clone());
        Ok(season)
    }

    async fn find_planting_by_farm_season_crop(
        &self,
        farm_id: &str,
        season_id: &str,
        crop_id: &str,
    ) -> StoreResult<Option<Planting>> {
        let tables = self.tables()?;
        Ok(tables
            .plantings
            .iter()
            .find(|p| p.farm_id == farm_id && p.season_id == season_id && p.crop_id == crop_id)
            .cloned())
    }

    async fn create_planting(&self, data: &NewPlanting) -> StoreResult<Planting> {
        let mut tables = self.tables()?;

        if !tables.farms.iter().any(|f| f.id == data.farm_id)
            || !tables.seasons.iter().any(|s| s.id == data.season_id)
            || !tables.crops.iter().any(|c| c.id == data.crop_id)
        {
            return Err(foreign_key("plantings references a missing farm, season or crop"));
        }

        if tables.plantings.iter().any(|p| {
            p.farm_id == data.farm_id && p.season_id == data.season_id && p.crop_id == data.crop_id
        }) {
            return Err(StoreError::unique(
                "plantings.farm_id, plantings.season_id, plantings.crop_id",
            ));
        }

        let planting = Planting {
            id: new_id(),
            planted_area: data.planted_area,
            planting_date: data.planting_date,
            expected_harvest_date: data.expected_harvest_date,
            notes: data.notes.clone(),
            farm_id: data.farm_id.clone(),
            season_id: data.season_id.clone(),
            crop_id: data.crop_id.clone(),
            created_at: Utc::now(),
        };
        tables.plantings.push(planting.clone());
        Ok(planting)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
