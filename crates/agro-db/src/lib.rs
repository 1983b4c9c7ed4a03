//! # agro-db: SQLite Persistence for the Farm Registry
//!
//! Implements `agro_core::RegistryStore` on SQLite with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Farm Registry Data Flow                          │
//! │                                                                         │
//! │  agro-core rules / DashboardAggregator                                  │
//! │       │  (dyn RegistryStore)                                            │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     agro-db (THIS CRATE)                        │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │ producer.rs   │    │  (embedded)  │    │    │
//! │  │   │               │◄───│ farm.rs       │    │ 001_initial  │    │    │
//! │  │   │ SqlitePool    │    │ crop.rs       │    │  _schema.sql │    │    │
//! │  │   │               │    │ season.rs     │    │              │    │    │
//! │  │   │               │    │ planting.rs   │    │              │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  │            ▲                                                    │    │
//! │  │            └── SqliteRegistryStore (store.rs)                   │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (AGRO_DATABASE_PATH, default ./agro_dev.db)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Pool settings and environment loading
//! - [`pool`] - Connection pool creation
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//! - [`store`] - `RegistryStore` implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use agro_core::{DashboardAggregator, ProducerRules};
//! use agro_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//! let store = Arc::new(db.registry_store());
//!
//! let producers = ProducerRules::new(Arc::clone(&store));
//! let snapshot = DashboardAggregator::new(store).build_snapshot().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig, DEFAULT_DATABASE_PATH};
pub use error::{DbError, DbResult};
pub use pool::Database;
pub use store::SqliteRegistryStore;

pub use repository::{
    CropRepository, FarmRepository, PlantingRepository, ProducerRepository, SeasonRepository,
};
