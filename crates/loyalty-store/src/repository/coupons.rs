//! # Coupon Repository
//!
//! The master list of every coupon ever issued. A card consuming a coupon
//! does not remove it from here.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use loyalty_core::Coupon;

#[derive(Debug, Clone, Default)]
pub struct CouponRepository {
    coupons: BTreeMap<String, Arc<Coupon>>,
}

impl CouponRepository {
    pub fn new() -> Self {
        CouponRepository::default()
    }

    /// Issues a coupon.
    ///
    /// ## Returns
    /// * `Err(StoreError::Duplicate)` - Coupon number already issued
    pub fn insert(&mut self, coupon: Coupon) -> StoreResult<Arc<Coupon>> {
        debug!(number = %coupon.number(), kind = %coupon.kind(), "Issuing coupon");

        if self.coupons.contains_key(coupon.number()) {
            return Err(StoreError::duplicate("Coupon", coupon.number()));
        }

        let coupon = Arc::new(coupon);
        self.coupons
            .insert(coupon.number().to_string(), Arc::clone(&coupon));
        Ok(coupon)
    }

    pub fn get(&self, number: &str) -> Option<&Arc<Coupon>> {
        self.coupons.get(number)
    }

    pub fn require(&self, number: &str) -> StoreResult<&Arc<Coupon>> {
        self.coupons
            .get(number)
            .ok_or_else(|| StoreError::not_found("Coupon", number))
    }

    pub fn remove(&mut self, number: &str) -> Option<Arc<Coupon>> {
        debug!(number = %number, "Withdrawing coupon");
        self.coupons.remove(number)
    }

    /// Coupons in number order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Coupon>> {
        self.coupons.values()
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}
