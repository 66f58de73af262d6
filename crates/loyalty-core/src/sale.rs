//! # Sale
//!
//! An ordered list of sold lines. Line order is the order coupons are
//! matched in during redemption.
//!
//! ```text
//! Sale
//!  ├── [0] SoldLineItem { 202-006 @ 231, coupon: 1003 }
//!  ├── [1] SoldLineItem { 203-001 @ 156, coupon: none }
//!  └── [2] SoldLineItem { 214-016 @ 1352, coupon: 1550 }
//!                                  total() = 1739
//! ```
//!
//! Coupons never lower the sale total; they credit the card instead.

use std::sync::Arc;

use crate::catalog::CatalogEntry;
use crate::coupon::Coupon;
use crate::money::Money;
use crate::validation::{validate_amount, ValidationResult};

// =============================================================================
// Sold Line Item
// =============================================================================

/// One product within a sale, priced at the moment it was sold.
#[derive(Debug, Clone)]
pub struct SoldLineItem {
    entry: Arc<CatalogEntry>,
    sale_price: Money,
    applied_coupon: Option<Arc<Coupon>>,
}

impl SoldLineItem {
    /// Sells `entry` at its current catalog price.
    pub fn new(entry: Arc<CatalogEntry>) -> Self {
        let sale_price = entry.price();
        SoldLineItem {
            entry,
            sale_price,
            applied_coupon: None,
        }
    }

    /// Sells `entry` at a price other than the catalog's.
    pub fn with_price(entry: Arc<CatalogEntry>, sale_price: Money) -> ValidationResult<Self> {
        validate_amount("sale price", sale_price)?;
        Ok(SoldLineItem {
            entry,
            sale_price,
            applied_coupon: None,
        })
    }

    #[inline]
    pub fn catalog_entry(&self) -> &Arc<CatalogEntry> {
        &self.entry
    }

    #[inline]
    pub fn sale_price(&self) -> Money {
        self.sale_price
    }

    #[inline]
    pub fn applied_coupon(&self) -> Option<&Arc<Coupon>> {
        self.applied_coupon.as_ref()
    }

    /// Replaces any coupon already attached.
    pub(crate) fn attach_coupon(&mut self, coupon: Arc<Coupon>) {
        self.applied_coupon = Some(coupon);
    }
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Sale {
    items: Vec<SoldLineItem>,
}

impl Sale {
    pub fn new() -> Self {
        Sale::default()
    }

    /// Appends a line at the end of the sale.
    pub fn add(&mut self, item: SoldLineItem) {
        self.items.push(item);
    }

    #[inline]
    pub fn items(&self) -> &[SoldLineItem] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [SoldLineItem] {
        &mut self.items
    }

    /// Sum of every line's sale price.
    pub fn total(&self) -> Money {
        self.items.iter().map(SoldLineItem::sale_price).sum()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(barcode: &str, cents: i64) -> Arc<CatalogEntry> {
        Arc::new(CatalogEntry::new(barcode, "Nacional", "Massa", Money::from_cents(cents)).unwrap())
    }

    #[test]
    fn test_line_defaults_to_catalog_price() {
        let item = SoldLineItem::new(entry("202-006", 231));
        assert_eq!(item.sale_price().cents(), 231);
        assert!(item.applied_coupon().is_none());
    }

    #[test]
    fn test_line_with_custom_price() {
        let item = SoldLineItem::with_price(entry("202-006", 231), Money::from_cents(200)).unwrap();
        assert_eq!(item.sale_price().cents(), 200);
        assert_eq!(item.catalog_entry().price().cents(), 231);

        assert!(SoldLineItem::with_price(entry("202-006", 231), Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_sale_keeps_order_and_totals() {
        let mut sale = Sale::new();
        assert!(sale.is_empty());
        assert!(sale.total().is_zero());

        sale.add(SoldLineItem::new(entry("202-006", 231)));
        sale.add(SoldLineItem::new(entry("202-008", 238)));
        sale.add(SoldLineItem::new(entry("202-006", 231)));

        assert_eq!(sale.len(), 3);
        assert_eq!(sale.total().cents(), 700);
        let barcodes: Vec<_> = sale.items().iter().map(|i| i.catalog_entry().barcode()).collect();
        assert_eq!(barcodes, ["202-006", "202-008", "202-006"]);
    }

    #[test]
    fn test_clear() {
        let mut sale = Sale::new();
        sale.add(SoldLineItem::new(entry("202-006", 231)));
        sale.clear();
        assert!(sale.is_empty());
        assert!(sale.total().is_zero());
    }
}
