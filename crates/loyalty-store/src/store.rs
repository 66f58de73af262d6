//! # Store
//!
//! The aggregate that owns every repository and wires loaded records into
//! domain entities.
//!
//! ## Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  products.hnt ──► CatalogRepository                                    │
//! │                         │ barcodes                                      │
//! │  coupons.hnt  ──► CouponRepository   (offsets + today → dates)         │
//! │                         │ coupon numbers                                │
//! │  cards.hnt    ──► CardRepository                                       │
//! │                                                                         │
//! │  Each file resolves its references against the ones before it; an      │
//! │  unknown barcode or coupon number fails the load with NotFound.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Days, NaiveDate};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::loader::{self, CardRecord, CouponRecord, DataFiles, ProductRecord};
use crate::repository::{CardRepository, CatalogRepository, CouponRepository};
use loyalty_core::{
    CatalogEntry, CoreError, Coupon, CouponKind, Discount, LoyaltyCard, Sale, SoldLineItem,
    ValidationError, ValidityPeriod,
};

/// Every entity the loyalty program knows about.
///
/// ## Usage
/// ```rust
/// use loyalty_core::{CatalogEntry, Money, Sale};
/// use loyalty_store::Store;
///
/// let mut store = Store::new();
/// store.catalog_mut()
///     .insert(CatalogEntry::new("203-001", "Luso", "Agua", Money::from_cents(156)).unwrap())
///     .unwrap();
///
/// let mut sale = Sale::new();
/// store.sell(&mut sale, "203-001").unwrap();
/// assert!(store.sell(&mut sale, "999-999").is_err());
/// assert_eq!(sale.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Store {
    catalog: CatalogRepository,
    coupons: CouponRepository,
    cards: CardRepository,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Store::default()
    }

    // =========================================================================
    // Repository Accessors
    // =========================================================================

    pub fn catalog(&self) -> &CatalogRepository {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut CatalogRepository {
        &mut self.catalog
    }

    pub fn coupons(&self) -> &CouponRepository {
        &self.coupons
    }

    pub fn coupons_mut(&mut self) -> &mut CouponRepository {
        &mut self.coupons
    }

    pub fn cards(&self) -> &CardRepository {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut CardRepository {
        &mut self.cards
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Appends `barcode` to `sale` at its catalog price.
    ///
    /// ## Errors
    /// `NotFound` if the catalog has no such product. The sale is unchanged.
    pub fn sell(&self, sale: &mut Sale, barcode: &str) -> StoreResult<()> {
        let entry = self.catalog.require(barcode).map_err(|e| {
            warn!(barcode = %barcode, "Cannot sell unknown product");
            e
        })?;
        sale.add(SoldLineItem::new(Arc::clone(entry)));
        Ok(())
    }

    /// Builds a sale from barcodes, in order.
    pub fn build_sale<'a>(&self, barcodes: impl IntoIterator<Item = &'a str>) -> StoreResult<Sale> {
        let mut sale = Sale::new();
        for barcode in barcodes {
            self.sell(&mut sale, barcode)?;
        }
        debug!(lines = sale.len(), total = sale.total().cents(), "Built sale");
        Ok(sale)
    }

    /// Looks up issued coupons by number, in order.
    pub fn resolve_coupons<'a>(
        &self,
        numbers: impl IntoIterator<Item = &'a str>,
    ) -> StoreResult<Vec<Arc<Coupon>>> {
        numbers
            .into_iter()
            .map(|number| self.coupons.require(number).map(Arc::clone))
            .collect()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads a store from the three data files in `dir`.
    ///
    /// Coupon day offsets are resolved against `today`.
    pub fn load_from_dir(dir: &Path, files: &DataFiles, today: NaiveDate) -> StoreResult<Self> {
        info!(dir = %dir.display(), %today, "Loading store");

        let products = loader::read_products(&dir.join(&files.products))?;
        let coupons = loader::read_coupons(&dir.join(&files.coupons))?;
        let cards = loader::read_cards(&dir.join(&files.cards))?;

        let store = Self::from_records(products, coupons, cards, today)?;
        info!(
            products = store.catalog.len(),
            coupons = store.coupons.len(),
            cards = store.cards.len(),
            "Store loaded"
        );
        Ok(store)
    }

    /// Builds a store from already-parsed records.
    pub fn from_records(
        products: Vec<ProductRecord>,
        coupons: Vec<CouponRecord>,
        cards: Vec<CardRecord>,
        today: NaiveDate,
    ) -> StoreResult<Self> {
        let mut store = Store::new();

        for record in products {
            let entry = CatalogEntry::new(record.barcode, record.brand, record.model, record.price)?;
            store.catalog.insert(entry)?;
        }

        for record in coupons {
            let coupon = store.issue(&record, today)?;
            store.coupons.insert(coupon)?;
        }

        for record in cards {
            let card = store.open_card(record)?;
            store.cards.insert(card)?;
        }

        Ok(store)
    }

    fn issue(&self, record: &CouponRecord, today: NaiveDate) -> StoreResult<Coupon> {
        let from = offset_date(today, record.from_offset)
            .ok_or_else(|| StoreError::parse("coupons", record.line, "start date out of range"))?;
        let to = offset_date(today, record.to_offset)
            .ok_or_else(|| StoreError::parse("coupons", record.line, "end date out of range"))?;

        let validity = ValidityPeriod::new(from, to)?;
        let discount = Discount::from_percent(record.percent)?;
        let payload = record.payload.clone().unwrap_or_default();

        let coupon = match record.kind {
            CouponKind::ProductList => {
                let covered = record
                    .barcodes()
                    .into_iter()
                    .map(|barcode| self.catalog.require(barcode).map(Arc::clone))
                    .collect::<StoreResult<Vec<_>>>()?;
                Coupon::product_list(&record.number, &record.summary, discount, validity, covered)?
            }
            CouponKind::Brand => {
                Coupon::brand(&record.number, &record.summary, discount, validity, payload)?
            }
            CouponKind::PurchaseWide => {
                Coupon::purchase_wide(&record.number, &record.summary, discount, validity)?
            }
        };
        Ok(coupon)
    }

    fn open_card(&self, record: CardRecord) -> StoreResult<LoyaltyCard> {
        let mut card = LoyaltyCard::new(record.number)?;

        for number in &record.coupons {
            let coupon = self.coupons.require(number)?;
            match card.add_coupon(Arc::clone(coupon)) {
                Ok(()) => {}
                Err(CoreError::Validation(ValidationError::Duplicate { .. })) => {
                    warn!(card = %card.number(), coupon = %number, "Coupon listed twice for card");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(card)
    }
}

fn offset_date(today: NaiveDate, offset: i64) -> Option<NaiveDate> {
    if offset >= 0 {
        today.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        today.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use loyalty_core::Money;
    use std::fs;

    const PRODUCTS: &str = "\
202-006\tNacional\tEsparguete\t231
203-001\tLuso\tAgua 1.5L\t156
124-009\tAlbicereal\tMassa\t173
";

    const COUPONS: &str = "\
1003\t-1\t6\tProduto\tMassas\t15\t202-006,124-009
1501\t0\t6\tMarca\tAlbicereal\t10\tAlbicereal
1550\t0\t6\tCompra\tTudo\t10
1551\t2\t9\tCompra\tFuturo\t25
";

    const CARDS: &str = "\
10101\t1003,1501,1550,1551
20202\t1550
";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn loaded() -> Store {
        Store::from_records(
            loader::parse_products("products.hnt", PRODUCTS).unwrap(),
            loader::parse_coupons("coupons.hnt", COUPONS).unwrap(),
            loader::parse_cards("cards.hnt", CARDS).unwrap(),
            today(),
        )
        .unwrap()
    }

    #[test]
    fn test_from_records_wires_references() {
        let store = loaded();
        assert_eq!(store.catalog().len(), 3);
        assert_eq!(store.coupons().len(), 4);
        assert_eq!(store.cards().len(), 2);

        let card = store.cards().require("10101").unwrap();
        assert_eq!(card.coupons().len(), 4);

        let list = store.coupons().require("1003").unwrap();
        assert_eq!(list.validity().from(), NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());
        assert_eq!(list.validity().to(), NaiveDate::from_ymd_opt(2024, 5, 16).unwrap());
        assert_eq!(list.kind(), CouponKind::ProductList);
    }

    #[test]
    fn test_sell_unknown_barcode_leaves_sale() {
        let store = loaded();
        let mut sale = Sale::new();
        store.sell(&mut sale, "202-006").unwrap();

        let err = store.sell(&mut sale, "124-421").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(sale.len(), 1);
        assert_eq!(sale.total().cents(), 231);
    }

    #[test]
    fn test_build_sale_stops_at_unknown() {
        let store = loaded();
        assert!(store.build_sale(["202-006", "nope"]).is_err());

        let sale = store.build_sale(["202-006", "203-001", "202-006"]).unwrap();
        assert_eq!(sale.total().cents(), 618);
    }

    #[test]
    fn test_resolve_coupons() {
        let store = loaded();
        let coupons = store.resolve_coupons(["1550", "1003"]).unwrap();
        assert_eq!(coupons[0].number(), "1550");
        assert!(store.resolve_coupons(["1014"]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_unknown_barcode_in_coupon_fails_load() {
        let coupons = loader::parse_coupons("c", "1003\t0\t6\tProduto\tMassas\t15\t999-999").unwrap();
        let err = Store::from_records(
            loader::parse_products("p", PRODUCTS).unwrap(),
            coupons,
            Vec::new(),
            today(),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unknown_coupon_in_card_fails_load() {
        let err = Store::from_records(
            loader::parse_products("p", PRODUCTS).unwrap(),
            loader::parse_coupons("c", COUPONS).unwrap(),
            loader::parse_cards("k", "10101\t1014").unwrap(),
            today(),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref entity, .. } if entity == "Coupon"));
    }

    #[test]
    fn test_invalid_coupon_values_fail_load() {
        let products = || loader::parse_products("p", PRODUCTS).unwrap();

        let inverted = loader::parse_coupons("c", "1550\t5\t1\tCompra\tTudo\t10").unwrap();
        assert!(matches!(
            Store::from_records(products(), inverted, Vec::new(), today()),
            Err(StoreError::Validation(ValidationError::InvalidDateRange { .. }))
        ));

        let too_much = loader::parse_coupons("c", "1550\t0\t1\tCompra\tTudo\t150").unwrap();
        assert!(matches!(
            Store::from_records(products(), too_much, Vec::new(), today()),
            Err(StoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_redeem_from_loaded_store() {
        let mut store = loaded();
        let sale_items = ["202-006", "124-009", "203-001"];
        let mut sale = store.build_sale(sale_items).unwrap();
        let selection = store.resolve_coupons(["1501", "1003", "1550"]).unwrap();

        let card = store.cards_mut().require_mut("10101").unwrap();
        card.activate(&selection).unwrap();
        let redemption = card.redeem_on(&mut sale, today()).unwrap();

        // 202-006 ← 1003 (34), 124-009 ← 1501 (17) since 1003 is spent, 203-001 ← 1550 (15)
        assert_eq!(redemption.total(), Money::from_cents(66));
        assert_eq!(card.coupons().len(), 1);
        assert!(card.owns("1551"));
        assert_eq!(store.coupons().len(), 4, "issued coupons stay in the master list");
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("products.hnt"), PRODUCTS).unwrap();
        fs::write(dir.path().join("coupons.hnt"), COUPONS).unwrap();
        fs::write(dir.path().join("cards.hnt"), CARDS).unwrap();

        let store = Store::load_from_dir(dir.path(), &DataFiles::default(), today()).unwrap();
        assert_eq!(store.cards().len(), 2);
    }

    #[test]
    fn test_load_from_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("products.hnt"), PRODUCTS).unwrap();

        let err = Store::load_from_dir(dir.path(), &DataFiles::default(), today()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
