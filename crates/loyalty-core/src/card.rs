//! # Loyalty Card
//!
//! A customer's card: a balance, the coupons it owns, and the redemption
//! pass that turns coupons into balance.
//!
//! ## Card Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  activate(selection)  ┌──────────┐                       │
//! │   │ INACTIVE │ ────────────────────► │  ACTIVE  │                       │
//! │   │          │                       │          │                       │
//! │   │activated │                       │activated │                       │
//! │   │  = []    │ ◄──────────────────── │ ⊆ owned  │                       │
//! │   └──────────┘   redeem(&mut sale)   └──────────┘                       │
//! │                  1. sort activated by discount, best first              │
//! │                  2. per line: first valid coupon that covers it wins    │
//! │                  3. credit rebate, consume coupon                       │
//! │                  4. drop expired coupons, deactivate                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use chrono::NaiveDate;
//! use loyalty_core::{CatalogEntry, Coupon, Discount, LoyaltyCard, Money, Sale, SoldLineItem, ValidityPeriod};
//! use std::sync::Arc;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
//! let week = ValidityPeriod::new(today, today + chrono::Days::new(7)).unwrap();
//!
//! let pasta = Arc::new(CatalogEntry::new("202-006", "Nacional", "Esparguete", Money::from_cents(231)).unwrap());
//! let coupon = Arc::new(
//!     Coupon::product_list("1003", "Massas", Discount::from_percent(15).unwrap(), week, [Arc::clone(&pasta)]).unwrap(),
//! );
//!
//! let mut card = LoyaltyCard::new("10101").unwrap();
//! card.add_coupon(Arc::clone(&coupon)).unwrap();
//! card.activate(&[coupon]).unwrap();
//!
//! let mut sale = Sale::new();
//! sale.add(SoldLineItem::new(pasta));
//!
//! let redemption = card.redeem_on(&mut sale, today).unwrap();
//! assert_eq!(redemption.total().cents(), 34);
//! assert_eq!(card.balance().cents(), 34);
//! assert!(card.coupons().is_empty());
//! assert!(!card.is_active());
//! ```

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;

use crate::coupon::Coupon;
use crate::discount::Discount;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::sale::Sale;
use crate::validation::{require_non_blank, validate_amount, ValidationResult};

// =============================================================================
// Redemption Summary
// =============================================================================

/// The rebate credited for one sale line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRebate {
    /// Position of the line in the sale.
    pub line: usize,
    pub coupon: String,
    pub discount: Discount,
    pub rebate: Money,
}

/// What a redemption pass did.
///
/// Informational only: the card and sale already carry every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Redemption {
    lines: Vec<LineRebate>,
    total: Money,
    expired: Vec<String>,
}

impl Redemption {
    /// Lines that received a coupon, in sale order.
    pub fn lines(&self) -> &[LineRebate] {
        &self.lines
    }

    /// The rebate for sale line `index`, if it received one.
    pub fn for_line(&self, index: usize) -> Option<&LineRebate> {
        self.lines.iter().find(|l| l.line == index)
    }

    /// Sum of every credited rebate.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Numbers of the coupons retired by the expiry sweep.
    pub fn expired(&self) -> &[String] {
        &self.expired
    }
}

// =============================================================================
// Loyalty Card
// =============================================================================

#[derive(Debug, Clone)]
pub struct LoyaltyCard {
    number: String,
    balance: Money,
    owned: Vec<Arc<Coupon>>,
    activated: Vec<Arc<Coupon>>,
    is_active: bool,
}

impl LoyaltyCard {
    /// Creates an inactive card with zero balance and no coupons.
    pub fn new(number: impl Into<String>) -> ValidationResult<Self> {
        Self::with_balance(number, Money::zero())
    }

    /// Creates an inactive card with an opening balance.
    pub fn with_balance(number: impl Into<String>, balance: Money) -> ValidationResult<Self> {
        let number = require_non_blank("card number", number)?;
        validate_amount("balance", balance)?;
        Ok(LoyaltyCard {
            number,
            balance,
            owned: Vec::new(),
            activated: Vec::new(),
            is_active: false,
        })
    }

    #[inline]
    pub fn number(&self) -> &str {
        &self.number
    }

    #[inline]
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Owned coupons, in the order they were assigned.
    #[inline]
    pub fn coupons(&self) -> &[Arc<Coupon>] {
        &self.owned
    }

    /// Coupons selected for the next redemption pass.
    #[inline]
    pub fn activated(&self) -> &[Arc<Coupon>] {
        &self.activated
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn owns(&self, number: &str) -> bool {
        self.owned.iter().any(|c| c.number() == number)
    }

    // =========================================================================
    // Coupon Collection
    // =========================================================================

    /// Gives the card a coupon.
    ///
    /// ## Errors
    /// `Duplicate` if the card already owns a coupon with that number.
    pub fn add_coupon(&mut self, coupon: Arc<Coupon>) -> CoreResult<()> {
        if self.owns(coupon.number()) {
            return Err(ValidationError::Duplicate {
                field: "coupon".to_string(),
                value: coupon.number().to_string(),
            }
            .into());
        }
        self.owned.push(coupon);
        Ok(())
    }

    /// Takes a coupon away from the card, deselecting it as well.
    pub fn remove_coupon(&mut self, number: &str) -> Option<Arc<Coupon>> {
        let index = self.owned.iter().position(|c| c.number() == number)?;
        self.activated.retain(|c| c.number() != number);
        Some(self.owned.remove(index))
    }

    /// Drops every coupon whose validity ended before `date` and
    /// deactivates the card. Returns the dropped coupons.
    pub fn retire_expired(&mut self, date: NaiveDate) -> Vec<Arc<Coupon>> {
        let (expired, kept): (Vec<_>, Vec<_>) = self
            .owned
            .drain(..)
            .partition(|c| c.validity().has_ended_before(date));
        self.owned = kept;
        self.activated.clear();
        self.is_active = false;
        expired
    }

    // =========================================================================
    // Activation & Redemption
    // =========================================================================

    /// Selects the coupons to try on the next sale and activates the card.
    ///
    /// Validity dates are not checked until redemption. Repeated coupons
    /// count once, at their first position. The card activates its own copy
    /// of each coupon, never the caller's.
    ///
    /// ## Errors
    /// `CouponNotOwned` if any selected coupon is not on the card. The card
    /// is left untouched.
    pub fn activate(&mut self, selection: &[Arc<Coupon>]) -> CoreResult<()> {
        let mut activated: Vec<Arc<Coupon>> = Vec::with_capacity(selection.len());
        for coupon in selection {
            let owned = self
                .owned
                .iter()
                .find(|c| c.number() == coupon.number())
                .ok_or_else(|| CoreError::CouponNotOwned {
                    card: self.number.clone(),
                    coupon: coupon.number().to_string(),
                })?;

            if !activated.iter().any(|c| c.number() == owned.number()) {
                activated.push(Arc::clone(owned));
            }
        }

        self.activated = activated;
        self.is_active = true;
        Ok(())
    }

    /// Runs a redemption pass over `sale` using today's date.
    pub fn redeem(&mut self, sale: &mut Sale) -> CoreResult<Redemption> {
        self.redeem_on(sale, Local::now().date_naive())
    }

    /// Runs a redemption pass over `sale` as of `date`.
    ///
    /// Activated coupons are tried best discount first, ties in activation
    /// order. Each line takes the first valid coupon that covers it; that
    /// coupon is consumed and cannot serve a later line. Afterwards expired
    /// coupons are dropped and the card is deactivated.
    ///
    /// ## Errors
    /// - `CardNotActive` if [`activate`](Self::activate) was not called first
    /// - `Validation` if the credited rebates would overflow the balance
    ///
    /// Nothing changes in either case.
    pub fn redeem_on(&mut self, sale: &mut Sale, date: NaiveDate) -> CoreResult<Redemption> {
        if !self.is_active {
            return Err(CoreError::CardNotActive {
                card: self.number.clone(),
            });
        }

        let mut candidates = self.activated.clone();
        // stable: equal discounts keep activation order
        candidates.sort_by(|a, b| b.discount().cmp(&a.discount()));

        // Match first, mutate after, so an overflow leaves everything as it was.
        // Each line is visited once; its coverage does not depend on earlier matches.
        let mut matches: Vec<(usize, Arc<Coupon>, Money)> = Vec::new();
        let mut total = Money::zero();
        for (index, item) in sale.items().iter().enumerate() {
            let Some(position) = candidates
                .iter()
                .position(|c| c.is_valid(date) && c.covers(item))
            else {
                continue;
            };

            let coupon = candidates.remove(position);
            let rebate = item.sale_price().rebate(coupon.discount());
            total = total.checked_add(rebate).ok_or_else(balance_overflow)?;
            matches.push((index, coupon, rebate));
        }
        self.balance = self.balance.checked_add(total).ok_or_else(balance_overflow)?;

        let mut redemption = Redemption {
            total,
            ..Redemption::default()
        };
        let items = sale.items_mut();
        for (index, coupon, rebate) in matches {
            self.owned.retain(|c| c.number() != coupon.number());
            redemption.lines.push(LineRebate {
                line: index,
                coupon: coupon.number().to_string(),
                discount: coupon.discount(),
                rebate,
            });
            items[index].attach_coupon(coupon);
        }

        redemption.expired = self
            .retire_expired(date)
            .iter()
            .map(|c| c.number().to_string())
            .collect();

        Ok(redemption)
    }

    // =========================================================================
    // Balance
    // =========================================================================

    /// Adds `amount` to the balance.
    ///
    /// ## Errors
    /// `Validation` if amount < 0 or the new balance would overflow.
    pub fn credit(&mut self, amount: Money) -> CoreResult<()> {
        validate_amount("credit amount", amount)?;
        self.balance = self.balance.checked_add(amount).ok_or_else(balance_overflow)?;
        Ok(())
    }

    /// Spends `amount` of the balance.
    ///
    /// ## Errors
    /// - `Validation` if amount < 0
    /// - `InsufficientBalance` if amount > balance
    pub fn debit(&mut self, amount: Money) -> CoreResult<()> {
        validate_amount("debit amount", amount)?;
        if amount > self.balance {
            return Err(CoreError::InsufficientBalance {
                card: self.number.clone(),
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    // =========================================================================
    // Availability Queries
    // =========================================================================

    /// Owned coupons usable today.
    pub fn available_today(&self) -> Vec<&Arc<Coupon>> {
        self.available_on(Local::now().date_naive())
    }

    /// Owned coupons usable on `date`.
    pub fn available_on(&self, date: NaiveDate) -> Vec<&Arc<Coupon>> {
        self.owned.iter().filter(|c| c.is_valid(date)).collect()
    }

    /// Owned coupons that only become valid after today.
    pub fn upcoming(&self) -> Vec<&Arc<Coupon>> {
        self.upcoming_after(Local::now().date_naive())
    }

    /// Owned coupons whose first valid day is after `date`.
    pub fn upcoming_after(&self, date: NaiveDate) -> Vec<&Arc<Coupon>> {
        self.owned
            .iter()
            .filter(|c| c.validity().starts_after(date))
            .collect()
    }
}

fn balance_overflow() -> ValidationError {
    ValidationError::OutOfRange {
        field: "balance".to_string(),
        min: 0,
        max: i64::MAX,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
