//! # Catalog Repository
//!
//! Products by barcode.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use loyalty_core::{CatalogEntry, Money};

/// Repository for catalog entries.
///
/// ## Usage
/// ```rust
/// use loyalty_core::{CatalogEntry, Money};
/// use loyalty_store::CatalogRepository;
///
/// let mut catalog = CatalogRepository::new();
/// catalog.insert(CatalogEntry::new("203-001", "Luso", "Agua", Money::from_cents(156)).unwrap()).unwrap();
///
/// assert!(catalog.get("203-001").is_some());
/// assert!(catalog.require("999-999").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogRepository {
    entries: BTreeMap<String, Arc<CatalogEntry>>,
}

impl CatalogRepository {
    pub fn new() -> Self {
        CatalogRepository::default()
    }

    /// Adds a product.
    ///
    /// ## Returns
    /// * `Ok(Arc<CatalogEntry>)` - The shared handle now stored
    /// * `Err(StoreError::Duplicate)` - Barcode already listed
    pub fn insert(&mut self, entry: CatalogEntry) -> StoreResult<Arc<CatalogEntry>> {
        debug!(barcode = %entry.barcode(), "Inserting catalog entry");

        if self.entries.contains_key(entry.barcode()) {
            return Err(StoreError::duplicate("Product", entry.barcode()));
        }

        let entry = Arc::new(entry);
        self.entries
            .insert(entry.barcode().to_string(), Arc::clone(&entry));
        Ok(entry)
    }

    pub fn get(&self, barcode: &str) -> Option<&Arc<CatalogEntry>> {
        self.entries.get(barcode)
    }

    /// Like [`get`](Self::get), but a miss is an error.
    pub fn require(&self, barcode: &str) -> StoreResult<&Arc<CatalogEntry>> {
        self.entries
            .get(barcode)
            .ok_or_else(|| StoreError::not_found("Product", barcode))
    }

    pub fn remove(&mut self, barcode: &str) -> Option<Arc<CatalogEntry>> {
        debug!(barcode = %barcode, "Removing catalog entry");
        self.entries.remove(barcode)
    }

    /// Changes a product's catalog price.
    ///
    /// Sales and coupons already holding the entry keep the copy they have;
    /// only lookups after this call see the new price.
    pub fn update_price(&mut self, barcode: &str, price: Money) -> StoreResult<()> {
        debug!(barcode = %barcode, price = price.cents(), "Updating price");

        let entry = self
            .entries
            .get_mut(barcode)
            .ok_or_else(|| StoreError::not_found("Product", barcode))?;
        Arc::make_mut(entry).set_price(price)?;
        Ok(())
    }

    /// Entries in barcode order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CatalogEntry>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(barcode: &str, cents: i64) -> CatalogEntry {
        CatalogEntry::new(barcode, "Nacional", "Massa", Money::from_cents(cents)).unwrap()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut catalog = CatalogRepository::new();
        assert!(catalog.is_empty());

        catalog.insert(entry("202-008", 238)).unwrap();
        catalog.insert(entry("202-006", 231)).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.require("202-006").unwrap().price().cents(), 231);
        let barcodes: Vec<_> = catalog.iter().map(|e| e.barcode()).collect();
        assert_eq!(barcodes, ["202-006", "202-008"]);
    }

    #[test]
    fn test_duplicate_barcode_rejected() {
        let mut catalog = CatalogRepository::new();
        catalog.insert(entry("202-006", 231)).unwrap();
        let err = catalog.insert(entry("202-006", 1)).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(catalog.require("202-006").unwrap().price().cents(), 231);
    }

    #[test]
    fn test_require_missing() {
        let catalog = CatalogRepository::new();
        assert!(catalog.require("999-999").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_price_leaves_old_handles_alone() {
        let mut catalog = CatalogRepository::new();
        let held = catalog.insert(entry("202-006", 231)).unwrap();

        catalog.update_price("202-006", Money::from_cents(250)).unwrap();

        assert_eq!(catalog.require("202-006").unwrap().price().cents(), 250);
        assert_eq!(held.price().cents(), 231);
    }

    #[test]
    fn test_update_price_errors() {
        let mut catalog = CatalogRepository::new();
        catalog.insert(entry("202-006", 231)).unwrap();

        assert!(catalog
            .update_price("999-999", Money::from_cents(1))
            .unwrap_err()
            .is_not_found());
        assert!(matches!(
            catalog.update_price("202-006", Money::from_cents(-1)),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_remove() {
        let mut catalog = CatalogRepository::new();
        catalog.insert(entry("202-006", 231)).unwrap();
        assert!(catalog.remove("202-006").is_some());
        assert!(catalog.get("202-006").is_none());
    }
}
