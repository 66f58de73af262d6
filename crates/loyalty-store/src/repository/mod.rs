//! # Repository Module
//!
//! In-memory keyed storage for the loyalty program's entities.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Driver                                                                 │
//! │       │  store.catalog().require("202-006")                             │
//! │       ▼                                                                 │
//! │  CatalogRepository   barcode ──► Arc<CatalogEntry>                      │
//! │  CouponRepository    number  ──► Arc<Coupon>     (every coupon issued)  │
//! │  CardRepository      number  ──► LoyaltyCard     (owned, mutable)       │
//! │                                                                         │
//! │  Maps are ordered by key, so listings are stable between runs.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`] - Products by barcode
//! - [`CouponRepository`] - Issued coupons by number
//! - [`CardRepository`] - Loyalty cards by number

pub mod cards;
pub mod catalog;
pub mod coupons;

pub use cards::CardRepository;
pub use catalog::CatalogRepository;
pub use coupons::CouponRepository;
