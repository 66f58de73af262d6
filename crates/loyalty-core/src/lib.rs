//! # loyalty-core: Coupon Redemption Engine
//!
//! The pure business logic of the loyalty program: catalog entries, coupons,
//! sales, and the card that matches one against the other.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Loyalty Program Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    loyalty-cli (driver)                         │   │
//! │  │     config ──► load store ──► build sale ──► redeem ──► report │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             loyalty-store (repositories, .hnt loader)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ loyalty-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  coupon   │  │   sale    │  │   card    │  │   │
//! │  │   │CatalogEnt.│  │  Coupon   │  │   Sale    │  │LoyaltyCard│  │   │
//! │  │   │           │  │  Scope    │  │ SoldLine  │  │ Redemption│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO GLOBAL STATE                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`discount`] - Discount fractions in basis points
//! - [`catalog`] - Catalog entries
//! - [`coupon`] - Coupons and their coverage rules
//! - [`sale`] - Sales and sold line items
//! - [`card`] - Loyalty cards, activation and redemption
//! - [`error`] - Domain error types
//! - [`validation`] - Constructor argument checks
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: prices, balances and rebates are cents (i64)
//! 2. **Exact Discounts**: basis points, so `floor(price × discount)` is exact
//! 3. **Explicit Dates**: every date-dependent call has an `_on(date)` form
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod card;
pub mod catalog;
pub mod coupon;
pub mod discount;
pub mod error;
pub mod money;
pub mod sale;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use card::{LineRebate, LoyaltyCard, Redemption};
pub use catalog::CatalogEntry;
pub use coupon::{Coupon, CouponKind, CouponScope, ValidityPeriod};
pub use discount::Discount;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use sale::{Sale, SoldLineItem};
pub use validation::ValidationResult;
