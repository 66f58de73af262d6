//! # Discount
//!
//! The rebate fraction a coupon grants, stored exactly in basis points.
//!
//! ```text
//! 1 basis point = 0.01% = 1/10000
//!   1500 bps = 15%  = 0.15
//!  10000 bps = 100% = 1.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// A discount fraction in `[0.0, 1.0]`, held as basis points.
///
/// Ordering is by size, so sorting coupons by discount is a plain integer
/// comparison with no float edge cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Discount(u32);

impl Discount {
    /// Basis points in a whole (100%).
    pub const SCALE: u32 = 10_000;

    /// Creates a discount from basis points (0..=10000).
    pub fn from_bps(bps: u32) -> ValidationResult<Self> {
        if bps > Self::SCALE {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: Self::SCALE as i64,
            });
        }
        Ok(Discount(bps))
    }

    /// Creates a discount from a whole percentage (0..=100).
    ///
    /// This is the unit the coupon data files use.
    pub fn from_percent(percent: u32) -> ValidationResult<Self> {
        if percent > 100 {
            return Err(ValidationError::OutOfRange {
                field: "discount percent".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(Discount(percent * 100))
    }

    /// Creates a discount from a fraction in `[0.0, 1.0]`.
    ///
    /// The fraction is rounded to the nearest basis point. NaN and values
    /// outside the range are rejected, never clamped.
    ///
    /// ## Example
    /// ```rust
    /// use loyalty_core::Discount;
    ///
    /// assert_eq!(Discount::from_fraction(0.15).unwrap().bps(), 1500);
    /// assert!(Discount::from_fraction(1.01).is_err());
    /// assert!(Discount::from_fraction(-0.1).is_err());
    /// ```
    pub fn from_fraction(fraction: f64) -> ValidationResult<Self> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: 1,
            });
        }
        Ok(Discount((fraction * Self::SCALE as f64).round() as u32))
    }

    /// No discount.
    #[inline]
    pub const fn none() -> Self {
        Discount(0)
    }

    /// The whole amount (100%).
    #[inline]
    pub const fn full() -> Self {
        Discount(Self::SCALE)
    }

    /// Returns the discount in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the discount as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Returns the discount as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for Discount {
    fn default() -> Self {
        Discount::none()
    }
}

impl TryFrom<u32> for Discount {
    type Error = ValidationError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Discount::from_bps(bps)
    }
}

impl From<Discount> for u32 {
    fn from(discount: Discount) -> Self {
        discount.0
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{:.2}%", self.percentage())
        }
    }
}
