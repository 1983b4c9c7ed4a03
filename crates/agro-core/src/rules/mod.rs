//! # Rule Services
//!
//! Domain rules applied before the registry is mutated.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProducerRules::create_producer                                         │
//! │    document checksum ─► duplicate tax ID ─► store.create_producer       │
//! │                                                                         │
//! │  FarmRules::create_farm                                                 │
//! │    producer exists ─► area invariant ─► store.create_farm               │
//! │                                                                         │
//! │  PlantingRules::create_planting                                         │
//! │    crop ─► season ─► farm ─► duplicate triple ─► store.create_planting  │
//! │                                                                         │
//! │  First failing check wins. Nothing is written after a failure.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Duplicates and races
//! Duplicate checks are check-then-act. Two concurrent requests can both pass
//! the check; the store's UNIQUE constraint then rejects the loser, and the
//! rule translates that [`StoreError::UniqueViolation`] into the same
//! duplicate error the check would have produced.
//!
//! Each service holds an `Arc` of the store and an observer, and is cheap to
//! clone into request handlers.

pub mod crop;
pub mod farm;
pub mod planting;
pub mod producer;
pub mod season;

pub use crop::CropRules;
pub use farm::FarmRules;
pub use planting::PlantingRules;
pub use producer::ProducerRules;
pub use season::SeasonRules;

use crate::error::{CoreError, StoreError};

/// Maps a UNIQUE rejection to `duplicate`, passing anything else through.
pub(crate) fn duplicate_or(err: StoreError, duplicate: impl FnOnce() -> CoreError) -> CoreError {
    if err.is_unique_violation() {
        duplicate()
    } else {
        CoreError::Store(err)
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_duplicate_or_translates_unique_violation() {
        let err = duplicate_or(StoreError::unique("crops.name"), || {
            CoreError::DuplicateCrop {
                name: "Soja".to_string(),
            }
        });
        assert_eq!(err.kind(), ErrorKind::DuplicateCrop);
    }

    #[test]
    fn test_duplicate_or_passes_other_errors_through() {
        let err = duplicate_or(
            StoreError::ForeignKeyViolation {
                message: "farm has plantings".to_string(),
            },
            || unreachable!(),
        );
        assert!(matches!(
            err,
            CoreError::Store(StoreError::ForeignKeyViolation { .. })
        ));
    }
}
