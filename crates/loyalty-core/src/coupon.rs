//! # Coupons
//!
//! A coupon is a time-boxed discount with a coverage rule. The rule comes
//! in three closed variants, held in [`CouponScope`]:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Coupon                                         │
//! │   number • summary • discount • validity [from, to]                     │
//! │                              │                                          │
//! │           ┌──────────────────┼──────────────────┐                       │
//! │           ▼                  ▼                  ▼                       │
//! │    ProductList           Brand             PurchaseWide                 │
//! │    barcode in set        brand matches     every line                   │
//! │    AND no better         (ignoring case)                                │
//! │    coupon attached                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Coupons are shared between the issuing repository and the cards that own
//! them, so they are handed around as `Arc<Coupon>` and never mutated.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::catalog::CatalogEntry;
use crate::discount::Discount;
use crate::sale::SoldLineItem;
use crate::validation::{require_non_blank, validate_date_range, ValidationResult};

// =============================================================================
// Validity Period
// =============================================================================

/// An inclusive date range `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidityPeriod {
    from: NaiveDate,
    to: NaiveDate,
}

impl ValidityPeriod {
    /// Fails with `InvalidDateRange` if `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> ValidationResult<Self> {
        validate_date_range(from, to)?;
        Ok(ValidityPeriod { from, to })
    }

    #[inline]
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    #[inline]
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// True if `date` falls inside the period, both ends included.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// True once the last valid day is behind `date`.
    #[inline]
    pub fn has_ended_before(&self, date: NaiveDate) -> bool {
        self.to < date
    }

    /// True while the first valid day is still ahead of `date`.
    #[inline]
    pub fn starts_after(&self, date: NaiveDate) -> bool {
        self.from > date
    }
}

impl fmt::Display for ValidityPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.from, self.to)
    }
}

// =============================================================================
// Coupon Scope
// =============================================================================

/// Which line items a coupon can be applied to.
#[derive(Debug, Clone)]
pub enum CouponScope {
    /// A fixed set of products, keyed by barcode.
    ProductList {
        covered: BTreeMap<String, Arc<CatalogEntry>>,
    },
    /// Every product of one brand.
    Brand { brand: String },
    /// Every line of the purchase.
    PurchaseWide,
}

/// The variant tag of a [`CouponScope`], for listings and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    ProductList,
    Brand,
    PurchaseWide,
}

impl CouponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponKind::ProductList => "product_list",
            CouponKind::Brand => "brand",
            CouponKind::PurchaseWide => "purchase_wide",
        }
    }
}

impl fmt::Display for CouponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A discount coupon issued by the store.
///
/// Identity is the coupon number: equality and hashing ignore every other
/// field.
#[derive(Debug, Clone)]
pub struct Coupon {
    number: String,
    summary: String,
    discount: Discount,
    validity: ValidityPeriod,
    scope: CouponScope,
}

impl Coupon {
    fn with_scope(
        number: impl Into<String>,
        summary: impl Into<String>,
        discount: Discount,
        validity: ValidityPeriod,
        scope: CouponScope,
    ) -> ValidationResult<Self> {
        Ok(Coupon {
            number: require_non_blank("coupon number", number)?,
            summary: require_non_blank("coupon summary", summary)?,
            discount,
            validity,
            scope,
        })
    }

    /// Creates a coupon covering a fixed list of products.
    ///
    /// Listing the same product twice is harmless; the set keeps one copy.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use loyalty_core::{CatalogEntry, Coupon, Discount, Money, ValidityPeriod};
    /// use std::sync::Arc;
    ///
    /// let choc = Arc::new(CatalogEntry::new("125-011", "Milka", "Leite", Money::from_cents(220)).unwrap());
    /// let week = ValidityPeriod::new(
    ///     NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
    /// ).unwrap();
    ///
    /// let coupon = Coupon::product_list("1001", "Chocolates", Discount::from_percent(15).unwrap(), week, [choc]).unwrap();
    /// assert!(coupon.is_valid(NaiveDate::from_ymd_opt(2024, 5, 7).unwrap()));
    /// assert!(!coupon.is_valid(NaiveDate::from_ymd_opt(2024, 5, 8).unwrap()));
    /// ```
    pub fn product_list(
        number: impl Into<String>,
        summary: impl Into<String>,
        discount: Discount,
        validity: ValidityPeriod,
        covered: impl IntoIterator<Item = Arc<CatalogEntry>>,
    ) -> ValidationResult<Self> {
        let covered = covered
            .into_iter()
            .map(|entry| (entry.barcode().to_string(), entry))
            .collect();
        Self::with_scope(
            number,
            summary,
            discount,
            validity,
            CouponScope::ProductList { covered },
        )
    }

    /// Creates a coupon covering every product of `brand`.
    pub fn brand(
        number: impl Into<String>,
        summary: impl Into<String>,
        discount: Discount,
        validity: ValidityPeriod,
        brand: impl Into<String>,
    ) -> ValidationResult<Self> {
        let brand = require_non_blank("brand", brand)?;
        Self::with_scope(number, summary, discount, validity, CouponScope::Brand { brand })
    }

    /// Creates a coupon covering every line of a purchase.
    pub fn purchase_wide(
        number: impl Into<String>,
        summary: impl Into<String>,
        discount: Discount,
        validity: ValidityPeriod,
    ) -> ValidationResult<Self> {
        Self::with_scope(number, summary, discount, validity, CouponScope::PurchaseWide)
    }

    #[inline]
    pub fn number(&self) -> &str {
        &self.number
    }

    #[inline]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[inline]
    pub fn discount(&self) -> Discount {
        self.discount
    }

    #[inline]
    pub fn validity(&self) -> ValidityPeriod {
        self.validity
    }

    #[inline]
    pub fn scope(&self) -> &CouponScope {
        &self.scope
    }

    pub fn kind(&self) -> CouponKind {
        match self.scope {
            CouponScope::ProductList { .. } => CouponKind::ProductList,
            CouponScope::Brand { .. } => CouponKind::Brand,
            CouponScope::PurchaseWide => CouponKind::PurchaseWide,
        }
    }

    /// True if the coupon can be used on `date`.
    #[inline]
    pub fn is_valid(&self, date: NaiveDate) -> bool {
        self.validity.contains(date)
    }

    /// True if the coupon can be used today (local calendar date).
    pub fn is_valid_today(&self) -> bool {
        self.is_valid(Local::now().date_naive())
    }

    /// True if this coupon may be applied to `item`.
    ///
    /// Validity dates are not checked here; the redemption pass checks them.
    pub fn covers(&self, item: &SoldLineItem) -> bool {
        match &self.scope {
            CouponScope::ProductList { covered } => {
                let upgrades = item
                    .applied_coupon()
                    .map_or(true, |current| current.discount() < self.discount);
                upgrades && covered.contains_key(item.catalog_entry().barcode())
            }
            CouponScope::Brand { brand } => {
                item.catalog_entry().brand().to_lowercase() == brand.to_lowercase()
            }
            CouponScope::PurchaseWide => true,
        }
    }
}

impl PartialEq for Coupon {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Coupon {}

impl Hash for Coupon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn may() -> ValidityPeriod {
        ValidityPeriod::new(date(2024, 5, 1), date(2024, 5, 31)).unwrap()
    }

    fn pct(p: u32) -> Discount {
        Discount::from_percent(p).unwrap()
    }

    fn entry(barcode: &str, brand: &str, cents: i64) -> Arc<CatalogEntry> {
        Arc::new(CatalogEntry::new(barcode, brand, "Modelo", Money::from_cents(cents)).unwrap())
    }

    fn line(entry: &Arc<CatalogEntry>) -> SoldLineItem {
        SoldLineItem::new(Arc::clone(entry))
    }

    #[test]
    fn test_validity_period_rejects_inverted_range() {
        let err = ValidityPeriod::new(date(2024, 5, 2), date(2024, 5, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
        assert!(ValidityPeriod::new(date(2024, 5, 1), date(2024, 5, 1)).is_ok());
    }

    #[test]
    fn test_is_valid_is_inclusive() {
        let coupon = Coupon::purchase_wide("1550", "Tudo", pct(10), may()).unwrap();
        assert!(!coupon.is_valid(date(2024, 4, 30)));
        assert!(coupon.is_valid(date(2024, 5, 1)));
        assert!(coupon.is_valid(date(2024, 5, 15)));
        assert!(coupon.is_valid(date(2024, 5, 31)));
        assert!(!coupon.is_valid(date(2024, 6, 1)));
    }

    #[test]
    fn test_constructors_reject_blank_text() {
        assert!(Coupon::purchase_wide("", "Tudo", pct(10), may()).is_err());
        assert!(Coupon::purchase_wide("1550", "  ", pct(10), may()).is_err());
        assert!(Coupon::brand("1501", "Marca", pct(10), may(), "").is_err());
    }

    #[test]
    fn test_purchase_wide_covers_everything() {
        let coupon = Coupon::purchase_wide("1550", "Tudo", pct(10), may()).unwrap();
        let soap = entry("214-016", "Dove", 1352);
        let tuna = entry("127-001", "Bom Petisco", 108);

        assert!(coupon.covers(&line(&soap)));
        assert!(coupon.covers(&line(&tuna)));
        assert_eq!(coupon.kind(), CouponKind::PurchaseWide);
    }

    #[test]
    fn test_brand_ignores_case() {
        let coupon = Coupon::brand("1501", "Albicereal", pct(10), may(), "Albicereal").unwrap();

        assert!(coupon.covers(&line(&entry("124-001", "albicereal", 105))));
        assert!(coupon.covers(&line(&entry("124-002", "ALBICEREAL", 118))));
        assert!(!coupon.covers(&line(&entry("125-011", "Nestlé", 220))));
    }

    #[test]
    fn test_product_list_membership() {
        let pasta = entry("202-006", "Nacional", 231);
        let water = entry("203-001", "Luso", 156);
        let coupon =
            Coupon::product_list("1003", "Massas", pct(15), may(), [Arc::clone(&pasta)]).unwrap();

        assert!(coupon.covers(&line(&pasta)));
        assert!(!coupon.covers(&line(&water)));
    }

    #[test]
    fn test_product_list_only_upgrades() {
        let pasta = entry("202-006", "Nacional", 231);
        let ten = Arc::new(
            Coupon::product_list("1", "Dez", pct(10), may(), [Arc::clone(&pasta)]).unwrap(),
        );
        let fifteen = Arc::new(
            Coupon::product_list("2", "Quinze", pct(15), may(), [Arc::clone(&pasta)]).unwrap(),
        );

        let mut item = line(&pasta);
        item.attach_coupon(Arc::clone(&fifteen));
        assert!(!ten.covers(&item));
        assert!(!fifteen.covers(&item), "equal discount is not an upgrade");

        let mut item = line(&pasta);
        item.attach_coupon(Arc::clone(&ten));
        assert!(fifteen.covers(&item));
    }

    #[test]
    fn test_duplicate_products_collapse() {
        let pasta = entry("202-006", "Nacional", 231);
        let coupon =
            Coupon::product_list("1003", "Massas", pct(15), may(), [Arc::clone(&pasta), pasta])
                .unwrap();
        match coupon.scope() {
            CouponScope::ProductList { covered } => assert_eq!(covered.len(), 1),
            other => panic!("unexpected scope {other:?}"),
        }
    }

    #[test]
    fn test_equality_is_by_number() {
        let a = Coupon::purchase_wide("1550", "Tudo", pct(10), may()).unwrap();
        let b = Coupon::brand("1550", "Outro", pct(50), may(), "Luso").unwrap();
        assert_eq!(a, b);
    }
}
