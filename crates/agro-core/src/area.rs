//! # Area Validation
//!
//! The farm area invariant: arable and vegetation areas cannot together
//! exceed the farm's total area.
//!
//! Inputs are assumed non-negative; [`crate::validation::validate_new_farm`]
//! rejects negative areas at the boundary.

use crate::hectares::Hectares;

/// Returns `true` if `arable + vegetation <= total`.
///
/// A sum that overflows `i64` is treated as exceeding any total.
///
/// ## Example
/// ```rust
/// use agro_core::area::valid_farm_areas;
/// use agro_core::hectares::Hectares;
///
/// let total = Hectares::from_whole(1000);
/// assert!(valid_farm_areas(total, Hectares::from_whole(600), Hectares::from_whole(400)));
/// assert!(!valid_farm_areas(total, Hectares::from_whole(600), Hectares::from_whole(401)));
/// ```
pub fn valid_farm_areas(total: Hectares, arable: Hectares, vegetation: Hectares) -> bool {
    match arable.checked_add(vegetation) {
        Some(used) => total >= used,
        None => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ha(hundredths: i64) -> Hectares {
        Hectares::from_hundredths(hundredths)
    }

    #[test]
    fn test_within_total() {
        assert!(valid_farm_areas(ha(100_000), ha(50_000), ha(20_000)));
        assert!(valid_farm_areas(ha(100_000), ha(0), ha(0)));
        assert!(valid_farm_areas(ha(0), ha(0), ha(0)));
    }

    #[test]
    fn test_boundary_is_valid() {
        assert!(valid_farm_areas(ha(100_000), ha(60_000), ha(40_000)));
        assert!(valid_farm_areas(ha(30), ha(10), ha(20)));
    }

    #[test]
    fn test_exceeding_total() {
        assert!(!valid_farm_areas(ha(100_000), ha(60_000), ha(40_001)));
        assert!(!valid_farm_areas(ha(0), ha(1), ha(0)));
        assert!(!valid_farm_areas(ha(80_075), ha(80_075), ha(1)));
    }

    #[test]
    fn test_huge_areas_do_not_overflow() {
        let big = ha(i64::MAX / 2 + 1);
        assert!(!valid_farm_areas(big, big, big));
        assert!(!valid_farm_areas(ha(i64::MAX), ha(i64::MAX), ha(1)));
        assert!(valid_farm_areas(ha(i64::MAX), ha(i64::MAX - 1), ha(1)));

        let max = Hectares::max_area();
        assert!(!valid_farm_areas(max, max, max));
        assert!(valid_farm_areas(max, max, Hectares::zero()));
    }

    #[test]
    fn test_exhaustive_small_grid() {
        for total in 0..20 {
            for arable in 0..20 {
                for vegetation in 0..20 {
                    assert_eq!(
                        valid_farm_areas(ha(total), ha(arable), ha(vegetation)),
                        arable + vegetation <= total
                    );
                }
            }
        }
    }
}
