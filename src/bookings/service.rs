use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::bookings::{
    AgentLedger, Booking, BookingError, BookingRepository, BookingStatus, CampaignRepository,
    CreateBookingRequest, ProductRepository,
};
use crate::config::CancellationPolicy;
use crate::rules::{AvailabilityEngine, CommissionSplit, MarketplaceRules};

/// Service for booking business logic
///
/// Orchestrates the rule engines over the repository contracts: a request is
/// priced, admitted, and persisted as a pending booking; confirmation applies
/// the commission split and credits the owning agent exactly once.
#[derive(Clone)]
pub struct BookingService {
    products: Arc<dyn ProductRepository>,
    bookings: Arc<dyn BookingRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    ledger: Arc<dyn AgentLedger>,
    rules: Arc<MarketplaceRules>,
}

impl BookingService {
    /// Create a new BookingService
    pub fn new(
        products: Arc<dyn ProductRepository>,
        bookings: Arc<dyn BookingRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        ledger: Arc<dyn AgentLedger>,
        rules: Arc<MarketplaceRules>,
    ) -> Self {
        Self {
            products,
            bookings,
            campaigns,
            ledger,
            rules,
        }
    }

    /// Create a new booking
    ///
    /// Runs the full admission flow under the per product/date guard so that
    /// concurrent requests for the same slot are serialized: price the
    /// request, evaluate availability against the existing bookings, persist
    /// the pending booking, and record the auto-block when this request
    /// filled the last capacity.
    pub async fn create_booking(
        &self,
        user_id: Uuid,
        request: CreateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        request.validate()?;
        let duration_units = request.duration_units.unwrap_or(1);

        let _guard = self
            .rules
            .reserve_guard(request.product_id, request.date)
            .await;

        let product = self
            .products
            .find_by_id(request.product_id)
            .await?
            .ok_or(BookingError::ProductNotFound(request.product_id))?;

        let quote = self
            .rules
            .quote(&product, request.quantity, duration_units, now)?;

        let existing = self
            .bookings
            .list_for_date(product.id, request.date)
            .await?;
        let decision = self
            .rules
            .admit(&product, request.date, request.quantity, &existing)?;

        let booking = self
            .bookings
            .create(Booking::new(
                product.id,
                user_id,
                request.quantity,
                request.date,
                quote.duration_units,
                quote.total,
                quote.currency,
            ))
            .await?;

        if decision.date_now_blocked {
            // In-place mutation in the store; a whole-record update here
            // would race fills on other dates of the same product.
            self.products
                .add_auto_block(product.id, request.date)
                .await?;
        }

        tracing::info!(
            booking_id = %booking.id,
            product_id = %booking.product_id,
            total = %booking.total_price,
            "booking created"
        );

        Ok(booking)
    }

    /// Confirm a booking
    ///
    /// Validates the transition, computes the commission split, and credits
    /// the agent net to the owner's balance. The ledger's per-booking
    /// idempotency is the exactly-once guard: a repeat call reports the
    /// credit as already applied and returns no split, while a credit that
    /// failed after the transition landed is simply retried by confirming
    /// again.
    pub async fn confirm_booking(
        &self,
        booking_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(Booking, Option<CommissionSplit>), BookingError> {
        let (_, booking) = self
            .bookings
            .transition(booking_id, BookingStatus::Confirmed)
            .await?;

        let product = self
            .products
            .find_by_id(booking.product_id)
            .await?
            .ok_or(BookingError::ProductNotFound(booking.product_id))?;
        let campaigns = self.campaigns.list_all().await?;

        let split = self
            .rules
            .split_commission(booking.total_price, &product, &campaigns, now);
        let outcome = self
            .ledger
            .credit_once(product.owner_id, booking.id, split.agent_net)
            .await?;

        if !outcome.applied {
            return Ok((booking, None));
        }

        tracing::info!(
            booking_id = %booking.id,
            agent_id = %product.owner_id,
            credited = %split.agent_net,
            new_balance = %outcome.balance,
            "booking confirmed and agent credited"
        );

        Ok((booking, Some(split)))
    }

    /// Cancel a booking
    ///
    /// Capacity release follows the configured policy: by default a date that
    /// was auto-blocked stays blocked even when this cancellation drops the
    /// running total back below capacity.
    pub async fn cancel_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let existing = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        // Serialize with concurrent admissions on the same slot; a released
        // date must not race a booking attempt mid-evaluation.
        let _guard = self
            .rules
            .reserve_guard(existing.product_id, existing.date)
            .await;

        let (previous, booking) = self
            .bookings
            .transition(booking_id, BookingStatus::Cancelled)
            .await?;

        if previous != BookingStatus::Cancelled
            && self.rules.config().cancellation == CancellationPolicy::ReleaseCapacity
        {
            self.release_capacity_if_below(&booking).await?;
        }

        tracing::info!(booking_id = %booking.id, "booking cancelled");
        Ok(booking)
    }

    /// Mark a confirmed booking as delivered
    pub async fn complete_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let (_, booking) = self
            .bookings
            .transition(booking_id, BookingStatus::Completed)
            .await?;
        Ok(booking)
    }

    /// Re-open an auto-blocked date when the running total dropped back below
    /// capacity. Manual blocks are never released here.
    async fn release_capacity_if_below(&self, booking: &Booking) -> Result<(), BookingError> {
        let Some(product) = self.products.find_by_id(booking.product_id).await? else {
            return Ok(());
        };

        if !product.capacity_enforced() || !product.auto_blocked_dates.contains(&booking.date) {
            return Ok(());
        }

        let existing = self
            .bookings
            .list_for_date(product.id, booking.date)
            .await?;
        let total = AvailabilityEngine::booked_quantity(product.id, booking.date, &existing);

        if total < product.daily_capacity.unwrap_or(0) {
            self.products
                .remove_auto_block(product.id, booking.date)
                .await?;
            tracing::info!(
                product_id = %booking.product_id,
                date = %booking.date,
                remaining_total = total,
                "auto-blocked date released after cancellation"
            );
        }

        Ok(())
    }
}
