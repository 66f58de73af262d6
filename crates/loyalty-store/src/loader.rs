//! # Flat-File Loader
//!
//! Parses the store's tab-separated `.hnt` data files into records.
//!
//! ## File Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products.hnt   barcode ⇥ brand ⇥ model ⇥ price_cents                   │
//! │                 202-006 ⇥ Nacional ⇥ Esparguete 500g ⇥ 231              │
//! │                                                                         │
//! │  coupons.hnt    number ⇥ from ⇥ to ⇥ tag ⇥ summary ⇥ percent [⇥ data]   │
//! │                 1003 ⇥ -1 ⇥ 6 ⇥ Produto ⇥ Massas ⇥ 15 ⇥ 202-006,202-008 │
//! │                 1501 ⇥ 0 ⇥ 6 ⇥ Marca ⇥ Albicereal ⇥ 10 ⇥ Albicereal     │
//! │                 1550 ⇥ 0 ⇥ 6 ⇥ Compra ⇥ Tudo ⇥ 10                       │
//! │                                                                         │
//! │  cards.hnt      number ⇥ coupon,coupon,...                              │
//! │                 10101 ⇥ 1001,1003,1501                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `from`/`to` are day offsets from the load date.
//!
//! ## Line Policy
//! - Blank lines are ignored
//! - Wrong column count: skipped with a warning
//! - Unknown coupon tag: skipped with a warning
//! - Unparseable number: `StoreError::Parse` naming file and line
//!
//! The `parse_*` functions are pure; `read_*` wraps them with file access.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use loyalty_core::{CouponKind, Money};

/// Default file names inside a data directory.
pub const PRODUCTS_FILE: &str = "products.hnt";
pub const COUPONS_FILE: &str = "coupons.hnt";
pub const CARDS_FILE: &str = "cards.hnt";

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub barcode: String,
    pub brand: String,
    pub model: String,
    pub price: Money,
}

/// A coupon line, before its dates and products are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRecord {
    pub number: String,
    pub from_offset: i64,
    pub to_offset: i64,
    pub kind: CouponKind,
    pub summary: String,
    pub percent: u32,
    /// Barcodes for product coupons, the brand for brand coupons.
    pub payload: Option<String>,
    /// Line the record came from, for error messages.
    pub line: usize,
}

impl CouponRecord {
    /// Barcodes listed in the payload.
    pub fn barcodes(&self) -> Vec<&str> {
        split_list(self.payload.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub number: String,
    pub coupons: Vec<String>,
}

/// File names of the three data files, relative to a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub products: PathBuf,
    pub coupons: PathBuf,
    pub cards: PathBuf,
}

impl Default for DataFiles {
    fn default() -> Self {
        DataFiles {
            products: PathBuf::from(PRODUCTS_FILE),
            coupons: PathBuf::from(COUPONS_FILE),
            cards: PathBuf::from(CARDS_FILE),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses the contents of a products file.
pub fn parse_products(source_name: &str, contents: &str) -> StoreResult<Vec<ProductRecord>> {
    let mut records = Vec::new();

    for (line, columns) in data_lines(contents) {
        if columns.len() != 4 {
            warn!(source = source_name, line, columns = columns.len(), "Skipping product line, expected 4 columns");
            continue;
        }

        let price: i64 = parse_number(source_name, line, "price", columns[3])?;
        records.push(ProductRecord {
            barcode: columns[0].to_string(),
            brand: columns[1].to_string(),
            model: columns[2].to_string(),
            price: Money::from_cents(price),
        });
    }

    debug!(source = source_name, count = records.len(), "Parsed products");
    Ok(records)
}

/// Parses the contents of a coupons file.
pub fn parse_coupons(source_name: &str, contents: &str) -> StoreResult<Vec<CouponRecord>> {
    let mut records = Vec::new();

    for (line, columns) in data_lines(contents) {
        if columns.len() < 6 {
            warn!(source = source_name, line, columns = columns.len(), "Skipping coupon line, expected at least 6 columns");
            continue;
        }

        let Some(kind) = parse_kind(columns[3]) else {
            warn!(source = source_name, line, tag = columns[3], "Skipping coupon with unknown type");
            continue;
        };

        let from_offset = parse_number(source_name, line, "start offset", columns[1])?;
        let to_offset = parse_number(source_name, line, "end offset", columns[2])?;
        let percent = parse_number(source_name, line, "percentage", columns[5])?;

        let payload = columns
            .get(6)
            .map(|p| p.to_string())
            .filter(|p| !p.is_empty());
        if kind != CouponKind::PurchaseWide && payload.is_none() {
            return Err(StoreError::parse(
                source_name,
                line,
                format!("{kind} coupon {} has no payload", columns[0]),
            ));
        }

        records.push(CouponRecord {
            number: columns[0].to_string(),
            from_offset,
            to_offset,
            kind,
            summary: columns[4].to_string(),
            percent,
            payload,
            line,
        });
    }

    debug!(source = source_name, count = records.len(), "Parsed coupons");
    Ok(records)
}

/// Parses the contents of a cards file.
pub fn parse_cards(source_name: &str, contents: &str) -> StoreResult<Vec<CardRecord>> {
    let mut records = Vec::new();

    for (line, columns) in data_lines(contents) {
        if columns.len() < 2 {
            warn!(source = source_name, line, "Skipping card line without a coupon column");
            continue;
        }

        records.push(CardRecord {
            number: columns[0].to_string(),
            coupons: split_list(columns[1]).into_iter().map(String::from).collect(),
        });
    }

    debug!(source = source_name, count = records.len(), "Parsed cards");
    Ok(records)
}

/// Maps a coupon type tag to its kind, ignoring case.
pub fn parse_kind(tag: &str) -> Option<CouponKind> {
    match tag.to_lowercase().as_str() {
        "productlist" | "product" | "produto" => Some(CouponKind::ProductList),
        "brand" | "marca" => Some(CouponKind::Brand),
        "purchasewide" | "purchase" | "compra" => Some(CouponKind::PurchaseWide),
        _ => None,
    }
}

/// Non-blank lines split on tabs, with 1-based line numbers.
fn data_lines(contents: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line.split('\t').map(str::trim).collect()))
}

fn split_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_number<T: std::str::FromStr>(
    source_name: &str,
    line: usize,
    field: &str,
    value: &str,
) -> StoreResult<T> {
    value
        .parse()
        .map_err(|_| StoreError::parse(source_name, line, format!("invalid {field} '{value}'")))
}

// =============================================================================
// File Access
// =============================================================================

fn read_file(path: &Path) -> StoreResult<String> {
    debug!(path = %path.display(), "Reading data file");
    fs::read_to_string(path).map_err(|e| StoreError::io(path, e))
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn read_products(path: &Path) -> StoreResult<Vec<ProductRecord>> {
    parse_products(&source_name(path), &read_file(path)?)
}

pub fn read_coupons(path: &Path) -> StoreResult<Vec<CouponRecord>> {
    parse_coupons(&source_name(path), &read_file(path)?)
}

pub fn read_cards(path: &Path) -> StoreResult<Vec<CardRecord>> {
    parse_cards(&source_name(path), &read_file(path)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_products() {
        let contents = "202-006\tNacional\tEsparguete 500g\t231\n\n   \n203-001\tLuso\tAgua 1.5L\t156\n";
        let records = parse_products("products.hnt", contents).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].barcode, "202-006");
        assert_eq!(records[0].model, "Esparguete 500g");
        assert_eq!(records[1].price.cents(), 156);
    }

    #[test]
    fn test_products_wrong_column_count_is_skipped() {
        let contents = "202-006\tNacional\t231\n203-001\tLuso\tAgua\t156\textra\n124-001\tAlbicereal\tArroz\t105\n";
        let records = parse_products("products.hnt", contents).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].barcode, "124-001");
    }

    #[test]
    fn test_products_bad_price_names_line() {
        let contents = "202-006\tNacional\tEsparguete\t231\n\n203-001\tLuso\tAgua\tabc\n";
        let err = parse_products("products.hnt", contents).unwrap_err();
        match err {
            StoreError::Parse { source_name, line, .. } => {
                assert_eq!(source_name, "products.hnt");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_coupons_all_kinds() {
        let contents = "\
1003\t-1\t6\tProduto\tMassas\t15\t202-006, 202-008
1501\t0\t6\tmarca\tAlbicereal\t10\tAlbicereal
1550\t0\t6\tCOMPRA\tTudo\t10
1551\t2\t9\tPurchaseWide\tFuturo\t20
";
        let records = parse_coupons("coupons.hnt", contents).unwrap();
        assert_eq!(records.len(), 4);

        assert_eq!(records[0].kind, CouponKind::ProductList);
        assert_eq!(records[0].from_offset, -1);
        assert_eq!(records[0].barcodes(), ["202-006", "202-008"]);

        assert_eq!(records[1].kind, CouponKind::Brand);
        assert_eq!(records[1].payload.as_deref(), Some("Albicereal"));

        assert_eq!(records[2].kind, CouponKind::PurchaseWide);
        assert_eq!(records[2].payload, None);
        assert_eq!(records[3].line, 4);
    }

    #[test]
    fn test_unknown_coupon_tag_is_skipped() {
        let contents = "1001\t0\t6\tLoteria\tSorte\t50\n1550\t0\t6\tCompra\tTudo\t10\n";
        let records = parse_coupons("coupons.hnt", contents).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].number, "1550");
    }

    #[test]
    fn test_coupon_bad_numbers_are_errors() {
        assert!(parse_coupons("c", "1550\tzero\t6\tCompra\tTudo\t10").is_err());
        assert!(parse_coupons("c", "1550\t0\t6\tCompra\tTudo\t10%").is_err());
        assert!(parse_coupons("c", "1550\t0\t6\tCompra\tTudo\t-10").is_err());
    }

    #[test]
    fn test_product_coupon_without_payload_is_error() {
        let err = parse_coupons("coupons.hnt", "1003\t0\t6\tProduto\tMassas\t15").unwrap_err();
        assert!(matches!(err, StoreError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_cards() {
        let contents = "10101\t1001,1003,1501\n20202\n30303\t1002\n";
        let records = parse_cards("cards.hnt", contents).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].coupons, ["1001", "1003", "1501"]);
        assert_eq!(records[1].number, "30303");
    }

    #[test]
    fn test_parse_kind_aliases() {
        assert_eq!(parse_kind("Product"), Some(CouponKind::ProductList));
        assert_eq!(parse_kind("PRODUCTLIST"), Some(CouponKind::ProductList));
        assert_eq!(parse_kind("Brand"), Some(CouponKind::Brand));
        assert_eq!(parse_kind("purchase"), Some(CouponKind::PurchaseWide));
        assert_eq!(parse_kind("Cartao"), None);
    }

    #[test]
    fn test_read_products_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PRODUCTS_FILE);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "214-016\tCabeca Limpa\tSabonete\t1352").unwrap();

        let records = read_products(&path).unwrap();
        assert_eq!(records[0].price.cents(), 1352);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.hnt");

        match read_cards(&path).unwrap_err() {
            StoreError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
