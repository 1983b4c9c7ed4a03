//! # Error Types
//!
//! Domain-specific error types for agro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  agro-core errors (this file)                                          │
//! │  ├── CoreError        - Rule violations returned by the services       │
//! │  ├── ValidationError  - Boundary shape validation failures             │
//! │  └── StoreError       - Whatever the RegistryStore reported            │
//! │                                                                         │
//! │  agro-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures → StoreError       │
//! │                                                                         │
//! │  Flow: DbError → StoreError → CoreError → (API layer) → client         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mapping to a transport
//! The core never picks status codes. [`CoreError::kind`] returns an
//! [`ErrorKind`] the boundary layer maps itself (e.g. `NotFound` → 404,
//! duplicates → 409, `InvalidDocument`/`InvalidAreas`/`Validation` → 400).

use std::fmt;

use thiserror::Error;

use crate::hectares::Hectares;

// =============================================================================
// Entity Kind
// =============================================================================

/// Which registry entity a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Producer,
    Farm,
    Crop,
    Season,
    Planting,
}

impl EntityKind {
    /// Lowercase name used in messages and log fields.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Producer => "producer",
            EntityKind::Farm => "farm",
            EntityKind::Crop => "crop",
            EntityKind::Season => "season",
            EntityKind::Planting => "planting",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the rule services and the dashboard aggregator.
///
/// Every rule stops at the first failing check and returns one of these;
/// no mutation is attempted after a failure.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Tax ID is not a well-formed CPF or CNPJ.
    #[error("Invalid document: '{tax_id}' is not a valid CPF or CNPJ")]
    InvalidDocument { tax_id: String },

    /// Tax ID already belongs to another producer.
    ///
    /// ## When This Occurs
    /// - `create_producer` finds an existing producer with the same document
    /// - `update_producer` moves a document onto a producer that doesn't own it
    /// - The store rejects the write with a UNIQUE violation (lost race)
    #[error("A producer with document {tax_id} already exists")]
    DuplicateDocument { tax_id: String },

    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// Arable plus vegetation area exceeds the farm's total area.
    #[error(
        "Invalid farm areas: arable {arable} + vegetation {vegetation} exceeds total {total}"
    )]
    InvalidAreas {
        total: Hectares,
        arable: Hectares,
        vegetation: Hectares,
    },

    /// A planting already exists for this farm/season/crop triple.
    #[error(
        "Planting already registered for farm {farm_id}, season {season_id}, crop {crop_id}"
    )]
    DuplicatePlanting {
        farm_id: String,
        season_id: String,
        crop_id: String,
    },

    /// Crop name already registered.
    #[error("Crop '{name}' already exists")]
    DuplicateCrop { name: String },

    /// Season with the same name and year already registered.
    #[error("Season '{name}' ({year}) already exists")]
    DuplicateSeason { name: String, year: i32 },

    /// Boundary validation failure (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The store failed. Passed through unmodified.
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

/// Transport-agnostic classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDocument,
    DuplicateDocument,
    NotFound,
    InvalidAreas,
    DuplicatePlanting,
    DuplicateCrop,
    DuplicateSeason,
    Validation,
    StoreFailure,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidDocument => "invalid_document",
            ErrorKind::DuplicateDocument => "duplicate_document",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidAreas => "invalid_areas",
            ErrorKind::DuplicatePlanting => "duplicate_planting",
            ErrorKind::DuplicateCrop => "duplicate_crop",
            ErrorKind::DuplicateSeason => "duplicate_season",
            ErrorKind::Validation => "validation",
            ErrorKind::StoreFailure => "store_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CoreError {
    /// Creates a NotFound error for a given entity kind and ID.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns the error's kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidDocument { .. } => ErrorKind::InvalidDocument,
            CoreError::DuplicateDocument { .. } => ErrorKind::DuplicateDocument,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::InvalidAreas { .. } => ErrorKind::InvalidAreas,
            CoreError::DuplicatePlanting { .. } => ErrorKind::DuplicatePlanting,
            CoreError::DuplicateCrop { .. } => ErrorKind::DuplicateCrop,
            CoreError::DuplicateSeason { .. } => ErrorKind::DuplicateSeason,
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::Store(_) => ErrorKind::StoreFailure,
        }
    }

    /// For `NotFound`, the kind of entity that was missing.
    pub fn missing_entity(&self) -> Option<EntityKind> {
        match self {
            CoreError::NotFound { entity, .. } => Some(*entity),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Produced by [`crate::validation`] at the boundary, before any rule runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value length is outside the allowed range.
    #[error("{field} must be between {min} and {max} characters")]
    Length { field: String, min: usize, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is above the accepted maximum.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: String },

    /// Invalid format (e.g., invalid UUID, invalid state code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Date range is inverted.
    #[error("{end_field} must not be before {start_field}")]
    InvalidDateRange {
        start_field: String,
        end_field: String,
    },
}

// =============================================================================
// Store Error
// =============================================================================

/// Errors surfaced by a [`crate::store::RegistryStore`] implementation.
///
/// Constraint violations are kept distinguishable so the rules can translate
/// a store-level UNIQUE rejection into the matching duplicate error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A referential constraint rejected the write or delete.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Any other backend failure.
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl StoreError {
    /// Creates a UniqueViolation error.
    pub fn unique(constraint: impl Into<String>) -> Self {
        StoreError::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    /// Wraps an arbitrary backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Backend(Box::new(err))
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
