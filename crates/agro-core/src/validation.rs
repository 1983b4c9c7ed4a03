//! # Validation Module
//!
//! Input shape validation for Agro Registry.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API boundary (outside this workspace)                        │
//! │  ├── Deserialization (types, required fields)                          │
//! │  └── THIS MODULE: lengths, formats, signs, date ranges                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Rule services (crate::rules)                                 │
//! │  ├── Document checksum, area invariant                                 │
//! │  └── Existence and uniqueness checks against the store                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rule services assume their input already passed these checks; they
//! only enforce domain invariants.
//!
//! ## Usage
//! ```rust,ignore
//! use agro_core::validation::validate_new_farm;
//!
//! // In the API handler, before calling FarmRules::create_farm
//! validate_new_farm(&input)?;
//! let farm = farm_rules.create_farm(input).await?;
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::hectares::Hectares;
use crate::types::{NewCrop, NewFarm, NewPlanting, NewProducer, NewSeason, ProducerUpdate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required text field's trimmed length (in characters).
pub fn validate_text(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::Length {
            field: field.to_string(),
            min,
            max,
        });
    }

    Ok(())
}

/// Validates an optional text field; `None` is always accepted.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> ValidationResult<()> {
    match value {
        Some(value) => validate_text(field, value, min, max),
        None => Ok(()),
    }
}

/// Validates a two-letter state code (UF), e.g. "SP".
///
/// ## Example
/// ```rust
/// use agro_core::validation::validate_state_code;
///
/// assert!(validate_state_code("SP").is_ok());
/// assert!(validate_state_code("São Paulo").is_err());
/// ```
pub fn validate_state_code(state: &str) -> ValidationResult<()> {
    if state.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "state".to_string(),
        });
    }

    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "state".to_string(),
            reason: "must be a two-letter uppercase code".to_string(),
        });
    }

    Ok(())
}

/// Validates that an area is zero or more and at most [`Hectares::max_area`].
pub fn validate_non_negative_area(field: &str, area: Hectares) -> ValidationResult<()> {
    if area.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    validate_area_bound(field, area)
}

/// Validates that an area is strictly positive and at most [`Hectares::max_area`].
pub fn validate_positive_area(field: &str, area: Hectares) -> ValidationResult<()> {
    if !area.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    validate_area_bound(field, area)
}

fn validate_area_bound(field: &str, area: Hectares) -> ValidationResult<()> {
    let max = Hectares::max_area();
    if area > max {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: max.to_string(),
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use agro_core::validation::validate_uuid;
///
/// assert!(validate_uuid("farmId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("farmId", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates that `end` is not before `start`.
pub fn validate_date_range(
    start_field: &str,
    start: NaiveDate,
    end_field: &str,
    end: NaiveDate,
) -> ValidationResult<()> {
    if end < start {
        return Err(ValidationError::InvalidDateRange {
            start_field: start_field.to_string(),
            end_field: end_field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Shape checks for a new producer. The document checksum is a rule, not a
/// shape check, and runs in [`crate::rules::producer`].
pub fn validate_new_producer(input: &NewProducer) -> ValidationResult<()> {
    validate_text("name", &input.name, 2, 255)?;
    validate_text("taxId", &input.tax_id, 11, 18)?;
    Ok(())
}

pub fn validate_producer_update(input: &ProducerUpdate) -> ValidationResult<()> {
    validate_uuid("id", &input.id)?;
    validate_optional_text("name", input.name.as_deref(), 2, 255)?;
    validate_optional_text("taxId", input.tax_id.as_deref(), 11, 18)?;
    Ok(())
}

pub fn validate_new_farm(input: &NewFarm) -> ValidationResult<()> {
    validate_text("name", &input.name, 2, 255)?;
    validate_text("city", &input.city, 2, 100)?;
    validate_state_code(&input.state)?;
    validate_non_negative_area("totalAreaHectares", input.total_area)?;
    validate_non_negative_area("arableAreaHectares", input.arable_area)?;
    validate_non_negative_area("vegetationAreaHectares", input.vegetation_area)?;
    validate_uuid("producerId", &input.producer_id)?;
    Ok(())
}

pub fn validate_new_crop(input: &NewCrop) -> ValidationResult<()> {
    validate_text("name", &input.name, 2, 100)?;
    validate_optional_text("description", input.description.as_deref(), 2, 255)?;
    validate_optional_text("category", input.category.as_deref(), 2, 50)?;
    Ok(())
}

pub fn validate_new_season(input: &NewSeason) -> ValidationResult<()> {
    validate_text("name", &input.name, 1, 100)?;

    if input.year <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "year".to_string(),
        });
    }

    validate_date_range("startDate", input.start_date, "endDate", input.end_date)?;
    Ok(())
}

pub fn validate_new_planting(input: &NewPlanting) -> ValidationResult<()> {
    validate_positive_area("plantedAreaHectares", input.planted_area)?;
    validate_uuid("farmId", &input.farm_id)?;
    validate_uuid("seasonId", &input.season_id)?;
    validate_uuid("cropId", &input.crop_id)?;

    if let (Some(planted), Some(harvest)) = (input.planting_date, input.expected_harvest_date) {
        validate_date_range("plantingDate", planted, "expectedHarvestDate", harvest)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
