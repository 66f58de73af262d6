//! # Reports
//!
//! Serializable views of cards, coupons and redemptions, with a plain text
//! rendering for the terminal. `--json` prints the same structs with serde.
//!
//! ## Redeem Report Layout
//! ```text
//! ----- Initial card situation -----
//! Card: 10101  balance: 0.00
//!     coupon: 1003 - Massas - Active
//!
//! ----- Purchased products -----
//! Nacional        Esparguete 500g                 2.31
//!                    Credited to card (1003 15%)  0.34
//! Total credited: 0.34
//!
//! ----- Final card situation -----
//! Card: 10101  balance: 0.34
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

use loyalty_core::{Coupon, CouponKind, Discount, LoyaltyCard, Money, Redemption, Sale};

/// Amounts as plain `units.cents`.
pub fn format_amount(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, amount.major().abs(), amount.minor())
}

// =============================================================================
// Coupon & Card Views
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouponView {
    pub number: String,
    pub summary: String,
    pub kind: CouponKind,
    pub discount: Discount,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
}

impl From<&Coupon> for CouponView {
    fn from(coupon: &Coupon) -> Self {
        CouponView {
            number: coupon.number().to_string(),
            summary: coupon.summary().to_string(),
            kind: coupon.kind(),
            discount: coupon.discount(),
            valid_from: coupon.validity().from(),
            valid_to: coupon.validity().to(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardCouponView {
    #[serde(flatten)]
    pub coupon: CouponView,
    /// Selected for this redemption.
    pub active: bool,
}

/// A card's balance and owned coupons at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSnapshot {
    pub number: String,
    pub balance: Money,
    pub coupons: Vec<CardCouponView>,
}

impl CardSnapshot {
    /// Takes a snapshot, marking coupons whose number is in `active`.
    pub fn capture(card: &LoyaltyCard, active: &[String]) -> Self {
        CardSnapshot {
            number: card.number().to_string(),
            balance: card.balance(),
            coupons: card
                .coupons()
                .iter()
                .map(|c| CardCouponView {
                    coupon: CouponView::from(c.as_ref()),
                    active: active.iter().any(|n| n == c.number()),
                })
                .collect(),
        }
    }

    fn render(&self, out: &mut impl Write, mark_active: bool) -> io::Result<()> {
        writeln!(out, "Card: {}  balance: {}", self.number, format_amount(self.balance))?;
        for view in &self.coupons {
            let marker = if mark_active && view.active { " - Active" } else { "" };
            writeln!(
                out,
                "\tcoupon: {} - {}{}",
                view.coupon.number, view.coupon.summary, marker
            )?;
        }
        Ok(())
    }
}

// =============================================================================
// Redeem Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineView {
    pub barcode: String,
    pub brand: String,
    pub model: String,
    pub price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebate: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedeemReport {
    pub date: NaiveDate,
    pub initial: CardSnapshot,
    pub lines: Vec<LineView>,
    pub sale_total: Money,
    pub credited: Money,
    pub expired: Vec<String>,
    #[serde(rename = "final")]
    pub final_state: CardSnapshot,
}

impl RedeemReport {
    /// Assembles the report after a redemption pass over `sale`.
    pub fn new(
        date: NaiveDate,
        initial: CardSnapshot,
        sale: &Sale,
        redemption: &Redemption,
        card: &LoyaltyCard,
    ) -> Self {
        let lines = sale
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let entry = item.catalog_entry();
                let rebate = redemption.for_line(index);
                LineView {
                    barcode: entry.barcode().to_string(),
                    brand: entry.brand().to_string(),
                    model: entry.model().to_string(),
                    price: item.sale_price(),
                    coupon: rebate.map(|r| r.coupon.clone()),
                    discount: rebate.map(|r| r.discount),
                    rebate: rebate.map(|r| r.rebate),
                }
            })
            .collect();

        RedeemReport {
            date,
            initial,
            lines,
            sale_total: sale.total(),
            credited: redemption.total(),
            expired: redemption.expired().to_vec(),
            final_state: CardSnapshot::capture(card, &[]),
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "----- Initial card situation -----")?;
        self.initial.render(out, true)?;

        writeln!(out)?;
        writeln!(out, "----- Purchased products -----")?;
        for line in &self.lines {
            writeln!(
                out,
                "{:<15} {:<30} {:>6}",
                line.brand,
                line.model,
                format_amount(line.price)
            )?;
            if let (Some(coupon), Some(discount), Some(rebate)) =
                (&line.coupon, line.discount, line.rebate)
            {
                let label = format!("Credited to card ({coupon} {discount})");
                writeln!(out, "{:>46} {:>6}", label, format_amount(rebate))?;
            }
        }
        writeln!(out, "Total credited: {}", format_amount(self.credited))?;
        if !self.expired.is_empty() {
            writeln!(out, "Expired coupons removed: {}", self.expired.join(", "))?;
        }

        writeln!(out)?;
        writeln!(out, "----- Final card situation -----")?;
        self.final_state.render(out, false)
    }
}

// =============================================================================
// Card & Coupon Listings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardReport {
    pub number: String,
    pub balance: Money,
    pub available: Vec<CouponView>,
    pub upcoming: Vec<CouponView>,
}

impl CardReport {
    pub fn new(card: &LoyaltyCard, date: NaiveDate) -> Self {
        let views = |coupons: Vec<&Arc<Coupon>>| -> Vec<CouponView> {
            coupons.into_iter().map(|c| CouponView::from(c.as_ref())).collect()
        };
        CardReport {
            number: card.number().to_string(),
            balance: card.balance(),
            available: views(card.available_on(date)),
            upcoming: views(card.upcoming_after(date)),
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Card: {}  balance: {}", self.number, format_amount(self.balance))?;
        writeln!(out, "Available coupons:")?;
        render_coupon_rows(out, &self.available)?;
        writeln!(out, "Upcoming coupons:")?;
        render_coupon_rows(out, &self.upcoming)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouponListing {
    pub coupons: Vec<CouponView>,
}

impl CouponListing {
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        render_coupon_rows(out, &self.coupons)
    }
}

fn render_coupon_rows(out: &mut impl Write, coupons: &[CouponView]) -> io::Result<()> {
    if coupons.is_empty() {
        return writeln!(out, "\t(none)");
    }
    for c in coupons {
        writeln!(
            out,
            "\t{:<6} {:<14} {:>6}  {} .. {}  {}",
            c.number,
            c.kind.to_string(),
            c.discount.to_string(),
            c.valid_from,
            c.valid_to,
            c.summary
        )?;
    }
    Ok(())
}
