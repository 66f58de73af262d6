//! # Money Module
//!
//! Provides the `Money` type for prices, balances and rebates.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A 15% rebate on 2.31 computed with f32:                                │
//! │    231 × 0.15f = 34.649998...  → truncates to 34 ✔ (by luck)           │
//! │    100 × 0.29f = 28.999998...  → truncates to 28 ❌ (should be 29)      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer cents × integer basis points                     │
//! │    231 × 1500 / 10000 = 34     100 × 2900 / 10000 = 29                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use loyalty_core::money::Money;
//! use loyalty_core::Discount;
//!
//! let price = Money::from_cents(231); // 2.31
//! let rebate = price.rebate(Discount::from_percent(15).unwrap());
//! assert_eq!(rebate.cents(), 34);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::discount::Discount;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CatalogEntry.price ──► SoldLineItem.sale_price ──► Sale.total          │
/// │                                   │                                     │
/// │                                   └──► rebate() ──► LoyaltyCard.balance │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use loyalty_core::money::Money;
    ///
    /// let price = Money::from_cents(1352);
    /// assert_eq!(price.cents(), 1352);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Computes the rebate this amount earns at `discount`.
    ///
    /// The result is `floor(amount × discount)`: fractions of a cent are
    /// dropped, never rounded up.
    ///
    /// ## Example
    /// ```rust
    /// use loyalty_core::money::Money;
    /// use loyalty_core::Discount;
    ///
    /// let ten_percent = Discount::from_percent(10).unwrap();
    /// assert_eq!(Money::from_cents(1352).rebate(ten_percent).cents(), 135);
    /// assert_eq!(Money::from_cents(9).rebate(ten_percent).cents(), 0);
    /// ```
    pub fn rebate(&self, discount: Discount) -> Money {
        // i128 so that large balances cannot overflow the product
        let scaled = self.0 as i128 * discount.bps() as i128;
        let cents = scaled.div_euclid(Discount::SCALE as i128);
        Money::from_cents(cents as i64)
    }

    /// Adds two amounts, or `None` if the sum does not fit in an `i64`.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented rendering; reports decide their own presentation.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
