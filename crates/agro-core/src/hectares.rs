//! # Hectares Module
//!
//! Provides the `Hectares` type for land areas.
//!
//! ## Why Integer Areas?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Farm: total 0.3 ha, arable 0.1 ha, vegetation 0.2 ha                   │
//! │    0.1 + 0.2 = 0.30000000000000004 > 0.3   ❌ rejected!                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer hundredths of a hectare                          │
//! │    10 + 20 = 30 <= 30                      ✅ accepted                  │
//! │                                                                         │
//! │  Areas are registered with at most two decimal places, so every value   │
//! │  the boundary accepts is represented exactly.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use agro_core::hectares::Hectares;
//!
//! let total = Hectares::from_whole(1000);
//! let arable = Hectares::from_hundredths(60_050); // 600.50 ha
//! let vegetation = Hectares::from_f64(399.5).unwrap();
//!
//! assert_eq!(arable + vegetation, total);
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

// =============================================================================
// Hectares Type
// =============================================================================

/// A land area in hundredths of a hectare.
///
/// Serializes as a plain JSON number of hectares (`1000.5`), so API clients
/// never see the internal scale. Stored as INTEGER hundredths in SQLite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Hectares(i64);

/// Scale between hectares and the stored unit.
const HUNDREDTHS_PER_HECTARE: i64 = 100;

/// Largest area accepted from decimal input: one trillion hectares.
///
/// Far above any real farm, and small enough that adding any two areas
/// stays well inside `i64`.
pub const MAX_HECTARES: i64 = 1_000_000_000_000;

impl Hectares {
    /// Creates an area from hundredths of a hectare.
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Hectares(hundredths)
    }

    /// Creates an area from a whole number of hectares.
    ///
    /// Saturates at the `i64` bounds.
    #[inline]
    pub const fn from_whole(hectares: i64) -> Self {
        Hectares(hectares.saturating_mul(HUNDREDTHS_PER_HECTARE))
    }

    /// The largest area [`Hectares::from_f64`] accepts.
    #[inline]
    pub const fn max_area() -> Self {
        Hectares(MAX_HECTARES * HUNDREDTHS_PER_HECTARE)
    }

    /// Converts a decimal hectare value with at most two decimal places.
    ///
    /// Returns `None` for NaN, infinities, magnitudes above
    /// [`MAX_HECTARES`] and values with finer precision than a hundredth.
    ///
    /// ```rust
    /// use agro_core::hectares::Hectares;
    ///
    /// assert_eq!(Hectares::from_f64(800.25).unwrap().hundredths(), 80_025);
    /// assert!(Hectares::from_f64(0.006).is_none());
    /// assert!(Hectares::from_f64(f64::NAN).is_none());
    /// ```
    pub fn from_f64(hectares: f64) -> Option<Self> {
        if !hectares.is_finite() || hectares.abs() > MAX_HECTARES as f64 {
            return None;
        }

        let scaled = hectares * HUNDREDTHS_PER_HECTARE as f64;
        let rounded = scaled.round();

        // Tolerates the binary representation error of decimals like 0.1,
        // never a real third decimal place.
        let tolerance = (scaled.abs() * 1e-15).max(1e-6);
        if (scaled - rounded).abs() > tolerance {
            return None;
        }

        Some(Hectares(rounded as i64))
    }

    /// Adds two areas, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Hectares(sum)),
            None => None,
        }
    }

    /// Returns the area in hundredths of a hectare.
    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    /// Returns the area as decimal hectares (for display and JSON only).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / HUNDREDTHS_PER_HECTARE as f64
    }

    #[inline]
    pub const fn zero() -> Self {
        Hectares(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Hectares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = HUNDREDTHS_PER_HECTARE as u64;
        write!(f, "{}{}.{:02} ha", sign, abs / scale, abs % scale)
    }
}

// Operators saturate; use `checked_add` where overflow must be detected.

impl Add for Hectares {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Hectares(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Hectares {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Hectares {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Hectares(self.0.saturating_sub(other.0))
    }
}

impl Sum for Hectares {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Hectares::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Hectares> for Hectares {
    fn sum<I: Iterator<Item = &'a Hectares>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Hectares {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Hectares {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Hectares::from_f64(value)
            .ok_or_else(|| {
                de::Error::custom(
                    "hectares must be a finite number with at most two decimal places",
                )
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
