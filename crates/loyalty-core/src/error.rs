//! # Error Types
//!
//! Domain-specific error types for loyalty-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  loyalty-core errors (this file)                                       │
//! │  ├── CoreError        - Card state / ownership / balance failures      │
//! │  └── ValidationError  - Malformed construction arguments               │
//! │                                                                         │
//! │  loyalty-store errors (separate crate)                                 │
//! │  └── StoreError       - Lookup and flat-file failures                  │
//! │                                                                         │
//! │  loyalty-cli errors (in app)                                           │
//! │  └── CliError         - What the terminal sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CliError → stderr    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (card number, coupon number, etc.)
//! 3. Errors are enum variants, never String
//! 4. Nothing is clamped: a bad argument is always an error

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is raised before any balance or coupon mutation happens.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Redemption was requested on a card that has not been activated.
    ///
    /// ## When This Occurs
    /// ```text
    /// card.activate(&[...])   ← skipped
    ///      │
    ///      ▼
    /// card.redeem(&mut sale)
    ///      │
    ///      ▼
    /// CardNotActive { card: "10101" }
    /// ```
    #[error("Card {card} is not active, activate coupons before using it")]
    CardNotActive { card: String },

    /// Activation selected a coupon the card does not own.
    #[error("Coupon {coupon} does not belong to card {card}")]
    CouponNotOwned { card: String, coupon: String },

    /// Debit larger than the card's current balance.
    #[error("Card {card} has balance {balance}, cannot debit {requested}")]
    InsufficientBalance {
        card: String,
        balance: Money,
        requested: Money,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for errors caused by the card's current state rather than by
    /// the arguments of the call.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, CoreError::CardNotActive { .. })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur at construction time, before an entity exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or positive.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Validity period starts after it ends.
    #[error("validity starts {from} but ends {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    /// Duplicate value (e.g., a card owning the same coupon twice).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientBalance {
            card: "10101".to_string(),
            balance: Money::from_cents(150),
            requested: Money::from_cents(500),
        };
        assert_eq!(
            err.to_string(),
            "Card 10101 has balance $1.50, cannot debit $5.00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::InvalidDateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "validity starts 2024-03-10 but ends 2024-03-01"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "number".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(!core_err.is_invalid_state());
    }

    #[test]
    fn test_state_errors_are_flagged() {
        let err = CoreError::CardNotActive {
            card: "10101".to_string(),
        };
        assert!(err.is_invalid_state());

        let err = CoreError::CouponNotOwned {
            card: "10101".to_string(),
            coupon: "1001".to_string(),
        };
        assert!(!err.is_invalid_state());
    }
}
