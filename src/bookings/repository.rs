// Repository contracts and in-memory implementations
//
// The rule engines and the booking service depend only on these abstract
// read/write contracts; a database-backed implementation can replace the
// in-memory one without touching the rules. The in-memory stores are the
// crate's reference persistence layer and back the test suite.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::bookings::error::BookingError;
use crate::bookings::{Booking, BookingStatus, StatusMachine};
use crate::models::{Campaign, Product};

/// Read/write contract for product records
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: Product) -> Result<Product, BookingError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, BookingError>;
    /// Replace the stored product; fails when the id is unknown.
    async fn update(&self, product: Product) -> Result<Product, BookingError>;
    /// Record an engine-derived block for one date.
    ///
    /// Mutates the stored record in place. Writers on different dates of the
    /// same product must not overwrite each other, so this cannot be a
    /// load-modify-`update` round trip in the caller.
    async fn add_auto_block(&self, product_id: Uuid, date: NaiveDate) -> Result<(), BookingError>;
    /// Remove an engine-derived block for one date. Manual blocks are a
    /// separate set and are never touched by this.
    async fn remove_auto_block(
        &self,
        product_id: Uuid,
        date: NaiveDate,
    ) -> Result<(), BookingError>;
}

/// Read/write contract for booking records
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: Booking) -> Result<Booking, BookingError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, BookingError>;
    /// All bookings for one product/date, regardless of status.
    async fn list_for_date(
        &self,
        product_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError>;
    /// Atomically validate and apply a status transition, returning the
    /// previous status alongside the updated record. The cancellation flow
    /// uses the previous status to skip capacity release on repeat calls.
    async fn transition(
        &self,
        id: Uuid,
        new_status: BookingStatus,
    ) -> Result<(BookingStatus, Booking), BookingError>;
}

/// Read contract for the campaign collection
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn insert(&self, campaign: Campaign) -> Result<Campaign, BookingError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>, BookingError>;
    async fn list_all(&self) -> Result<Vec<Campaign>, BookingError>;
}

/// Outcome of a ledger credit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditOutcome {
    /// Whether this call applied the credit. `false` means the booking was
    /// already credited and the balance is unchanged.
    pub applied: bool,
    pub balance: Decimal,
}

/// Balance ledger for agent earnings
#[async_trait]
pub trait AgentLedger: Send + Sync {
    /// Credit an amount to the agent's balance at most once per booking.
    ///
    /// The booking id is the idempotency key: a booking whose credit already
    /// landed reports `applied: false` no matter how often confirmation is
    /// retried, and a credit that failed leaves no mark, so the next
    /// confirmation attempt applies it.
    async fn credit_once(
        &self,
        agent_id: Uuid,
        booking_id: Uuid,
        amount: Decimal,
    ) -> Result<CreditOutcome, BookingError>;
    async fn balance(&self, agent_id: Uuid) -> Result<Decimal, BookingError>;
}

/// In-memory product store
#[derive(Default)]
pub struct InMemoryProductRepository {
    items: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: Product) -> Result<Product, BookingError> {
        let mut items = self.items.write().await;
        items.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, BookingError> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn update(&self, product: Product) -> Result<Product, BookingError> {
        let mut items = self.items.write().await;
        if !items.contains_key(&product.id) {
            return Err(BookingError::ProductNotFound(product.id));
        }
        items.insert(product.id, product.clone());
        Ok(product)
    }

    async fn add_auto_block(&self, product_id: Uuid, date: NaiveDate) -> Result<(), BookingError> {
        let mut items = self.items.write().await;
        let product = items
            .get_mut(&product_id)
            .ok_or(BookingError::ProductNotFound(product_id))?;
        product.auto_blocked_dates.insert(date);
        Ok(())
    }

    async fn remove_auto_block(
        &self,
        product_id: Uuid,
        date: NaiveDate,
    ) -> Result<(), BookingError> {
        let mut items = self.items.write().await;
        let product = items
            .get_mut(&product_id)
            .ok_or(BookingError::ProductNotFound(product_id))?;
        product.auto_blocked_dates.remove(&date);
        Ok(())
    }
}

/// In-memory booking store
#[derive(Default)]
pub struct InMemoryBookingRepository {
    items: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, booking: Booking) -> Result<Booking, BookingError> {
        let mut items = self.items.write().await;
        items.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, BookingError> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn list_for_date(
        &self,
        product_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|b| b.product_id == product_id && b.date == date)
            .cloned()
            .collect())
    }

    async fn transition(
        &self,
        id: Uuid,
        new_status: BookingStatus,
    ) -> Result<(BookingStatus, Booking), BookingError> {
        let mut items = self.items.write().await;
        let booking = items.get_mut(&id).ok_or(BookingError::NotFound)?;

        let previous = booking.status;
        StatusMachine::transition(previous, new_status)
            .map_err(BookingError::InvalidTransition)?;

        booking.status = new_status;
        booking.updated_at = Utc::now();
        Ok((previous, booking.clone()))
    }
}

/// In-memory campaign store
#[derive(Default)]
pub struct InMemoryCampaignRepository {
    items: RwLock<HashMap<Uuid, Campaign>>,
}

impl InMemoryCampaignRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CampaignRepository for InMemoryCampaignRepository {
    async fn insert(&self, campaign: Campaign) -> Result<Campaign, BookingError> {
        let mut items = self.items.write().await;
        items.insert(campaign.id, campaign.clone());
        Ok(campaign)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>, BookingError> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Campaign>, BookingError> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }
}

/// In-memory agent balance ledger
///
/// Balances and the credited-booking set live behind one lock so a credit
/// and its idempotency mark land together.
#[derive(Default)]
pub struct InMemoryAgentLedger {
    state: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<Uuid, Decimal>,
    credited: HashSet<Uuid>,
}

impl InMemoryAgentLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentLedger for InMemoryAgentLedger {
    async fn credit_once(
        &self,
        agent_id: Uuid,
        booking_id: Uuid,
        amount: Decimal,
    ) -> Result<CreditOutcome, BookingError> {
        let mut state = self.state.write().await;

        if !state.credited.insert(booking_id) {
            let balance = state
                .balances
                .get(&agent_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            return Ok(CreditOutcome {
                applied: false,
                balance,
            });
        }

        let balance = state.balances.entry(agent_id).or_insert(Decimal::ZERO);
        *balance += amount;
        Ok(CreditOutcome {
            applied: true,
            balance: *balance,
        })
    }

    async fn balance(&self, agent_id: Uuid) -> Result<Decimal, BookingError> {
        let state = self.state.read().await;
        Ok(state
            .balances
            .get(&agent_id)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }
}
