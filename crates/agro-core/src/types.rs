//! # Domain Types
//!
//! Core domain types used throughout Agro Registry.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Producer     │1 *│      Farm       │1 *│    Planting     │       │
//! │  │  ─────────────  │──►│  ─────────────  │──►│  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  tax_id (CPF/   │   │  state (UF)     │   │  farm_id  ┐     │       │
//! │  │         CNPJ)   │   │  total_area     │   │  season_id├ uniq│       │
//! │  │  name           │   │  arable_area    │   │  crop_id  ┘     │       │
//! │  └─────────────────┘   │  vegetation_area│   │  planted_area   │       │
//! │                        └─────────────────┘   └───────▲─────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐           │                 │
//! │  │      Crop       │   │     Season      │───────────┘                 │
//! │  │  name (unique)  │   │  (name, year)   │                             │
//! │  └─────────────────┘   │     unique      │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Inputs vs Entities
//! `New*` structs are what the boundary hands to a rule; the store turns them
//! into entities by assigning `id` and timestamps. The core never holds an
//! entity across calls.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::hectares::Hectares;

// =============================================================================
// Producer
// =============================================================================

/// A rural producer, identified by a CPF (person) or CNPJ (company).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Producer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// CPF or CNPJ, digits only.
    pub tax_id: String,

    pub name: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProducer {
    pub name: String,

    /// CPF/CNPJ as typed by the user; punctuation is allowed.
    pub tax_id: String,
}

/// Partial update of a producer. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProducerUpdate {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub tax_id: Option<String>,
}

// =============================================================================
// Farm
// =============================================================================

/// A farm owned by a producer.
///
/// ## Invariant
/// `arable_area + vegetation_area <= total_area`, enforced by
/// [`crate::rules::farm::FarmRules::create_farm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Farm {
    pub id: String,

    pub name: String,

    pub city: String,

    /// Two-letter state code (UF), e.g. "SP".
    pub state: String,

    #[serde(rename = "totalAreaHectares")]
    #[ts(type = "number")]
    pub total_area: Hectares,

    #[serde(rename = "arableAreaHectares")]
    #[ts(type = "number")]
    pub arable_area: Hectares,

    #[serde(rename = "vegetationAreaHectares")]
    #[ts(type = "number")]
    pub vegetation_area: Hectares,

    /// Owning producer.
    pub producer_id: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewFarm {
    pub name: String,

    pub city: String,

    pub state: String,

    #[serde(rename = "totalAreaHectares")]
    #[ts(type = "number")]
    pub total_area: Hectares,

    #[serde(rename = "arableAreaHectares")]
    #[ts(type = "number")]
    pub arable_area: Hectares,

    #[serde(rename = "vegetationAreaHectares")]
    #[ts(type = "number")]
    pub vegetation_area: Hectares,

    pub producer_id: String,
}

// =============================================================================
// Crop
// =============================================================================

/// A crop that can be planted (e.g. "Soja", "Milho").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Crop {
    pub id: String,

    /// Unique across all crops.
    pub name: String,

    pub description: Option<String>,

    pub category: Option<String>,
}

/// Input for registering a crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCrop {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,
}

// =============================================================================
// Season
// =============================================================================

/// A harvest season ("Safra 2024/2025").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Season {
    pub id: String,

    pub name: String,

    pub year: i32,

    #[ts(as = "String")]
    pub start_date: NaiveDate,

    #[ts(as = "String")]
    pub end_date: NaiveDate,

    pub active: bool,
}

/// Input for registering a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSeason {
    pub name: String,

    pub year: i32,

    #[ts(as = "String")]
    pub start_date: NaiveDate,

    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// Seasons are active unless stated otherwise.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

// =============================================================================
// Planting
// =============================================================================

/// A crop grown on a farm during a season.
///
/// ## Invariant
/// At most one planting per (`farm_id`, `season_id`, `crop_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Planting {
    pub id: String,

    #[serde(rename = "plantedAreaHectares")]
    #[ts(type = "number")]
    pub planted_area: Hectares,

    #[ts(as = "Option<String>")]
    pub planting_date: Option<NaiveDate>,

    #[ts(as = "Option<String>")]
    pub expected_harvest_date: Option<NaiveDate>,

    pub notes: Option<String>,

    pub farm_id: String,

    pub season_id: String,

    pub crop_id: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for registering a planting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewPlanting {
    #[serde(rename = "plantedAreaHectares")]
    #[ts(type = "number")]
    pub planted_area: Hectares,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub planting_date: Option<NaiveDate>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expected_harvest_date: Option<NaiveDate>,

    #[serde(default)]
    pub notes: Option<String>,

    pub farm_id: String,

    pub season_id: String,

    pub crop_id: String,
}

// =============================================================================
// Aggregates
// =============================================================================
// Rows returned by the store's group-by / sum queries. They are inputs to the
// dashboard, not persisted entities.

/// Number of farms in one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StateCount {
    pub state: String,
    pub count: u64,
}

/// Number of distinct farms growing one crop, keyed by crop ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropIdCount {
    pub crop_id: String,
    pub count: u64,
}

/// Crop ID to display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropName {
    pub id: String,
    pub name: String,
}

/// Number of distinct farms growing one crop, keyed by crop name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CropCount {
    pub crop_name: String,
    pub count: u64,
}

/// Sum of arable and vegetation areas over all farms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LandUsage {
    #[ts(type = "number")]
    pub arable_total: Hectares,

    #[ts(type = "number")]
    pub vegetation_total: Hectares,
}

/// Point-in-time dashboard figures. Built fresh on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSnapshot {
    pub total_farms: u64,

    #[ts(type = "number")]
    pub total_hectares: Hectares,

    /// Sorted by count, descending.
    pub farms_by_state: Vec<StateCount>,

    /// Sorted by count, descending.
    pub farms_by_crop: Vec<CropCount>,

    pub land_usage: LandUsage,
}

// =============================================================================
// Unit Tests
// =============================================================================
