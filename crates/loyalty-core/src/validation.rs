//! # Validation Module
//!
//! Argument checks shared by every constructor in the crate.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Loader (loyalty-store)                                       │
//! │  ├── Column counts, integer parsing                                    │
//! │  └── Reference resolution (barcodes, coupon numbers)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Constructors (this crate)                                    │
//! │  └── THIS MODULE: blank ids, negative amounts, date ranges             │
//! │                                                                         │
//! │  An entity that exists has passed Layer 2.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use loyalty_core::validation::{require_non_blank, validate_amount};
//! use loyalty_core::Money;
//!
//! assert!(require_non_blank("barcode", "202-006").is_ok());
//! assert!(validate_amount("price", Money::from_cents(-1)).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Returns the value as an owned String if it contains a non-whitespace
/// character.
///
/// The value is kept as given; only the blank check looks past whitespace.
pub fn require_non_blank(field: &str, value: impl Into<String>) -> ValidationResult<String> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price, balance or amount.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, empty balances)
///
/// ## Example
/// ```rust
/// use loyalty_core::validation::validate_amount;
/// use loyalty_core::Money;
///
/// assert!(validate_amount("price", Money::from_cents(231)).is_ok());
/// assert!(validate_amount("price", Money::zero()).is_ok());
/// assert!(validate_amount("price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates that a period does not end before it starts.
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> ValidationResult<()> {
    if from > to {
        return Err(ValidationError::InvalidDateRange { from, to });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
