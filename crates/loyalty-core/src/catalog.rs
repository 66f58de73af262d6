//! # Catalog Entry
//!
//! The master product record, keyed by barcode.

use serde::Serialize;
use std::hash::{Hash, Hasher};

use crate::money::Money;
use crate::validation::{require_non_blank, validate_amount, ValidationResult};

/// A product the store sells.
///
/// Equality and hashing look at the barcode only, so two records with the
/// same barcode are the same product even if their prices differ.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    barcode: String,
    brand: String,
    model: String,
    price: Money,
}

impl CatalogEntry {
    /// Creates a catalog entry.
    ///
    /// ## Errors
    /// - `Required` if barcode, brand or model is blank
    /// - `MustBeNonNegative` if price < 0
    ///
    /// ## Example
    /// ```rust
    /// use loyalty_core::{CatalogEntry, Money};
    ///
    /// let pasta = CatalogEntry::new("202-006", "Nacional", "Esparguete", Money::from_cents(231)).unwrap();
    /// assert_eq!(pasta.price().cents(), 231);
    ///
    /// assert!(CatalogEntry::new("", "Nacional", "Esparguete", Money::zero()).is_err());
    /// ```
    pub fn new(
        barcode: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        price: Money,
    ) -> ValidationResult<Self> {
        let barcode = require_non_blank("barcode", barcode)?;
        let brand = require_non_blank("brand", brand)?;
        let model = require_non_blank("model", model)?;
        validate_amount("price", price)?;

        Ok(CatalogEntry {
            barcode,
            brand,
            model,
            price,
        })
    }

    #[inline]
    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    #[inline]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Current catalog price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Replaces the catalog price.
    ///
    /// Lines already sold keep the price they were sold at.
    pub fn set_price(&mut self, price: Money) -> ValidationResult<()> {
        validate_amount("price", price)?;
        self.price = price;
        Ok(())
    }
}

impl PartialEq for CatalogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.barcode == other.barcode
    }
}

impl Eq for CatalogEntry {}

impl Hash for CatalogEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.barcode.hash(state);
    }
}
