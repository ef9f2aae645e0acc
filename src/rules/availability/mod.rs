// Availability Engine
//
// Decides whether a booking request for a given product, date, and quantity
// may proceed, and derives the auto-blocked date state once daily capacity
// fills. Marking the date blocked is the only capacity-tracking mechanism;
// there is no decrement path.

use crate::bookings::{Booking, BookingStatus};
use crate::models::Product;
use crate::rules::error::{RulesError, RulesResult};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

/// Outcome of an accepted admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityDecision {
    /// Running quantity total for the date including this request.
    pub new_total: u32,
    /// Whether this request filled the last capacity and the date must now
    /// be added to the product's auto-blocked set.
    pub date_now_blocked: bool,
}

/// Availability Engine
///
/// The admission rule itself is pure; the engine also owns a per
/// `(product_id, date)` lock table so callers can serialize the full
/// read-check-write sequence and keep two simultaneous requests for the last
/// slot from slipping past each other.
pub struct AvailabilityEngine {
    locks: RwLock<HashMap<(Uuid, NaiveDate), Arc<Mutex<()>>>>,
}

impl AvailabilityEngine {
    /// Create a new AvailabilityEngine
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Acquire the serialization guard for one product/date slot
    ///
    /// The caller must hold the guard across loading the product, evaluating
    /// admission, and persisting both the booking and any new block.
    pub async fn acquire(&self, product_id: Uuid, date: NaiveDate) -> OwnedMutexGuard<()> {
        let key = (product_id, date);

        let slot = {
            let table = self.locks.read().await;
            table.get(&key).cloned()
        };

        let slot = match slot {
            Some(slot) => slot,
            None => {
                let mut table = self.locks.write().await;
                table
                    .entry(key)
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone()
            }
        };

        slot.lock_owned().await
    }

    /// Evaluate an admission request against the product's blocked state and
    /// the existing bookings for the date
    ///
    /// Blocked dates reject outright. Capacity never hard-rejects on its own:
    /// the request that reaches or crosses the daily capacity is still
    /// accepted, and only then is the date marked for blocking so that all
    /// later requests fail. This is an all-or-nothing decision with no
    /// waitlist semantics.
    pub fn evaluate(
        &self,
        product: &Product,
        date: NaiveDate,
        quantity: u32,
        existing: &[Booking],
    ) -> RulesResult<AvailabilityDecision> {
        if quantity == 0 {
            return Err(RulesError::InvalidQuantity);
        }

        if product.is_date_blocked(date) {
            return Err(RulesError::DateUnavailable(date));
        }

        let current_total = Self::booked_quantity(product.id, date, existing);
        // Saturate rather than wrap: a pathological quantity still lands in
        // the at-or-over-capacity branch and blocks the date.
        let new_total = current_total.saturating_add(quantity);

        let date_now_blocked = match product.daily_capacity {
            Some(cap) if cap > 0 => new_total >= cap,
            _ => false,
        };

        Ok(AvailabilityDecision {
            new_total,
            date_now_blocked,
        })
    }

    /// Sum of quantities across non-cancelled bookings for one product/date
    pub fn booked_quantity(product_id: Uuid, date: NaiveDate, bookings: &[Booking]) -> u32 {
        bookings
            .iter()
            .filter(|b| {
                b.product_id == product_id
                    && b.date == date
                    && b.status != BookingStatus::Cancelled
            })
            .map(|b| b.quantity)
            .sum()
    }
}

impl Default for AvailabilityEngine {
    fn default() -> Self {
        Self::new()
    }
}
