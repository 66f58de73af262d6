//! # Commands
//!
//! One function per subcommand. Each takes the loaded store and returns a
//! report; printing is left to the caller.
//!
//! ```text
//! redeem  ──► build sale ──► resolve coupons ──► activate ──► redeem ──► RedeemReport
//! card    ──► lookup card ──► available / upcoming              ──► CardReport
//! coupons ──► every issued coupon                                ──► CouponListing
//! ```

use chrono::NaiveDate;
use tracing::info;

use crate::cli::{CardArgs, RedeemArgs};
use crate::error::CliResult;
use crate::report::{CardReport, CardSnapshot, CouponListing, CouponView, RedeemReport};
use loyalty_store::Store;

/// Sells `args.items` on `args.card`, applying `args.coupons`.
///
/// Every lookup happens before the card is touched, so an unknown barcode,
/// coupon or card leaves the store unchanged.
pub fn redeem(store: &mut Store, args: &RedeemArgs, date: NaiveDate) -> CliResult<RedeemReport> {
    let mut sale = store.build_sale(args.items.iter().map(String::as_str))?;
    let selection = store.resolve_coupons(args.coupons.iter().map(String::as_str))?;

    let card = store.cards_mut().require_mut(&args.card)?;
    let initial = CardSnapshot::capture(card, &args.coupons);

    card.activate(&selection)?;
    let redemption = card.redeem_on(&mut sale, date)?;

    info!(
        card = %card.number(),
        lines = sale.len(),
        credited = redemption.total().cents(),
        balance = card.balance().cents(),
        "Redemption complete"
    );

    Ok(RedeemReport::new(date, initial, &sale, &redemption, card))
}

pub fn card(store: &Store, args: &CardArgs, date: NaiveDate) -> CliResult<CardReport> {
    let card = store.cards().require(&args.number)?;
    Ok(CardReport::new(card, date))
}

pub fn coupons(store: &Store) -> CouponListing {
    CouponListing {
        coupons: store
            .coupons()
            .iter()
            .map(|c| CouponView::from(c.as_ref()))
            .collect(),
    }
}
