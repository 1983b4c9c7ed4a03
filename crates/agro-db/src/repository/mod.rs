//! # Repository Module
//!
//! One repository per table. Each holds a clone of the pool and keeps its
//! SQL in one place.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteRegistryStore / seed binary                                      │
//! │       │                                                                 │
//! │       │  db.farms().count_by_state()                                    │
//! │       ▼                                                                 │
//! │  FarmRepository                                                         │
//! │  ├── get_by_id / insert                                                 │
//! │  └── count / sum_total_area / count_by_state / land_usage               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProducerRepository`] - Producer CRUD, lookup by tax ID
//! - [`FarmRepository`] - Farm insert/lookup and the farm aggregates
//! - [`CropRepository`] - Crop catalogue, ID to name resolution
//! - [`SeasonRepository`] - Harvest seasons
//! - [`PlantingRepository`] - Plantings and distinct farms per crop

pub mod crop;
pub mod farm;
pub mod planting;
pub mod producer;
pub mod season;

pub use crop::CropRepository;
pub use farm::FarmRepository;
pub use planting::PlantingRepository;
pub use producer::ProducerRepository;
pub use season::SeasonRepository;
