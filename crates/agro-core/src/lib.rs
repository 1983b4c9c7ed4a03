//! # agro-core: Domain Rules for Agro Registry
//!
//! This crate holds the business rules of the rural producer registry:
//! document validation, the farm area invariant, producer/farm/planting
//! registration checks, and the dashboard aggregation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Agro Registry Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              API boundary (HTTP handlers, CLI, seed)            │   │
//! │  │     deserialize ──► validation::* ──► rules ──► map ErrorKind   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ agro-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ document  │  │   area    │  │   rules   │  │ dashboard │  │   │
//! │  │   │ CPF/CNPJ  │  │ Hectares  │  │ Producer  │  │ Snapshot  │  │   │
//! │  │   │ checksums │  │ invariant │  │ Farm, ... │  │ try_join! │  │   │
//! │  │   └───────────┘  └───────────┘  └─────┬─────┘  └─────┬─────┘  │   │
//! │  │                                       └──────┬───────┘        │   │
//! │  │                                  dyn RegistryStore (trait)     │   │
//! │  │   NO DATABASE • NO NETWORK • STORE IS A TRAIT                  │   │
//! │  └──────────────────────────────────────┬──────────────────────────┘   │
//! │                                         │                               │
//! │  ┌──────────────────────────────────────▼──────────────────────────┐   │
//! │  │                agro-db (SqliteRegistryStore)                    │   │
//! │  │           SQLite queries, migrations, UNIQUE constraints        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`document`] - CPF/CNPJ normalization and checksum validation
//! - [`area`] - Farm area invariant
//! - [`hectares`] - Hectares type with integer arithmetic
//! - [`types`] - Entities, inputs and dashboard rows
//! - [`rules`] - Producer, farm, planting, crop and season rule services
//! - [`dashboard`] - Snapshot aggregation
//! - [`store`] - The `RegistryStore` trait and an in-memory implementation
//! - [`observer`] - Hook around every rule invocation
//! - [`validation`] - Boundary shape validation
//! - [`error`] - Error types
//!
//! ## Design Principles
//!
//! 1. **Store as a trait**: rules never see SQL; tests run on [`MemoryStore`]
//! 2. **Integer areas**: hundredths of a hectare, so the area invariant is exact
//! 3. **First failure wins**: a rule stops at its first failing check and
//!    writes nothing
//! 4. **Explicit Errors**: every failure is a typed [`CoreError`], never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use agro_core::{DashboardAggregator, FarmRules, Hectares, MemoryStore, NewFarm};
//! use agro_core::{NewProducer, ProducerRules};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = Arc::new(MemoryStore::new());
//!
//! let producer = ProducerRules::new(Arc::clone(&store))
//!     .create_producer(NewProducer {
//!         name: "João Silva".into(),
//!         tax_id: "529.982.247-25".into(),
//!     })
//!     .await?;
//!
//! FarmRules::new(Arc::clone(&store))
//!     .create_farm(NewFarm {
//!         name: "Fazenda Boa Vista".into(),
//!         city: "Campinas".into(),
//!         state: "SP".into(),
//!         total_area: Hectares::from_whole(1000),
//!         arable_area: Hectares::from_whole(600),
//!         vegetation_area: Hectares::from_whole(400),
//!         producer_id: producer.id,
//!     })
//!     .await?;
//!
//! let snapshot = DashboardAggregator::new(store).build_snapshot().await?;
//! assert_eq!(snapshot.total_farms, 1);
//! assert_eq!(snapshot.total_hectares, Hectares::from_whole(1000));
//! # Ok::<(), agro_core::CoreError>(())
//! # }).unwrap();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod area;
pub mod dashboard;
pub mod document;
pub mod error;
pub mod hectares;
pub mod observer;
pub mod rules;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use agro_core::Hectares` instead of
// `use agro_core::hectares::Hectares`

pub use dashboard::{DashboardAggregator, UNKNOWN_CROP_LABEL};
pub use document::{is_valid_document, normalize_document, DocumentKind};
pub use error::{
    CoreError, CoreResult, EntityKind, ErrorKind, StoreError, StoreResult, ValidationError,
};
pub use hectares::Hectares;
pub use observer::{NoopObserver, RuleObserver, TracingObserver};
pub use rules::{CropRules, FarmRules, PlantingRules, ProducerRules, SeasonRules};
pub use store::{MemoryStore, RegistryStore};
pub use types::*;
