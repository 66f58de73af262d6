//! # loyalty-store: Repositories and Data Loading
//!
//! Keeps the catalog, the issued coupons and the loyalty cards in memory,
//! and fills them from the store's `.hnt` data files.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  loyalty-cli                                                            │
//! │       │  Store::load_from_dir(dir, &files, today)                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 loyalty-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │   Loader     │  │   │
//! │  │   │  (store.rs)   │    │               │    │ (loader.rs)  │  │   │
//! │  │   │               │◄───│ Catalog       │    │ products.hnt │  │   │
//! │  │   │ sell          │    │ Coupons       │    │ coupons.hnt  │  │   │
//! │  │   │ build_sale    │    │ Cards         │    │ cards.hnt    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  loyalty-core (entities, redemption)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `Store` aggregate
//! - [`repository`] - Per-entity repositories
//! - [`loader`] - Tab-separated file parsing
//! - [`error`] - Store error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod loader;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use loader::DataFiles;
pub use store::Store;

pub use repository::{CardRepository, CatalogRepository, CouponRepository};
