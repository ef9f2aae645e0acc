// Booking Rules Module
//
// The three rule engines of the marketplace core:
// - Availability: admission decisions and auto-blocked date derivation
// - Pricing: quote totals with flash-sale overrides
// - Commission: platform fee / agent net splits with campaign overrides
// plus the catalog-time campaign participation check.

pub mod availability;
pub mod campaign;
pub mod commission;
pub mod error;
pub mod metrics;
pub mod pricing;

// Re-export commonly used types for convenience
pub use availability::{AvailabilityDecision, AvailabilityEngine};
pub use commission::{CommissionSplit, CommissionSplitter};
pub use error::{RulesError, RulesResult};
pub use metrics::{MetricsSummary, RulesMetrics};
pub use pricing::{PricingCalculator, Quote};

use crate::config::RulesConfig;
use crate::models::{Campaign, FlashSale, Product};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

/// Marketplace rules engine
///
/// Single construction point for the rule engines, with one entry method per
/// decision. All methods are synchronous computations over already-loaded
/// data; only the per-slot serialization guard is async.
pub struct MarketplaceRules {
    availability: AvailabilityEngine,
    commission: CommissionSplitter,
    metrics: Arc<RulesMetrics>,
    config: RulesConfig,
}

impl MarketplaceRules {
    /// Create a new MarketplaceRules engine
    pub fn new(config: RulesConfig) -> Self {
        let metrics = Arc::new(RulesMetrics::new());

        Self {
            availability: AvailabilityEngine::new(),
            commission: CommissionSplitter::new(config.commission.clone()),
            metrics,
            config,
        }
    }

    /// Get the engine configuration
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Get the performance metrics
    pub fn metrics(&self) -> &RulesMetrics {
        &self.metrics
    }

    /// Acquire the serialization guard for one product/date slot
    ///
    /// Hold this across the whole load-evaluate-persist sequence of a booking
    /// attempt; see `AvailabilityEngine::acquire`.
    pub async fn reserve_guard(&self, product_id: Uuid, date: NaiveDate) -> OwnedMutexGuard<()> {
        self.availability.acquire(product_id, date).await
    }

    /// Decide whether a booking request may be admitted
    pub fn admit(
        &self,
        product: &Product,
        date: NaiveDate,
        quantity: u32,
        existing: &[crate::bookings::Booking],
    ) -> RulesResult<AvailabilityDecision> {
        let _timer = self.metrics.start_admission_check();

        let result = self.availability.evaluate(product, date, quantity, existing);
        match &result {
            Ok(decision) => {
                tracing::info!(
                    product_id = %product.id,
                    %date,
                    quantity,
                    new_total = decision.new_total,
                    date_now_blocked = decision.date_now_blocked,
                    "booking request admitted"
                );
            }
            Err(reason) => {
                self.metrics.record_rejection();
                tracing::info!(
                    product_id = %product.id,
                    %date,
                    quantity,
                    %reason,
                    "booking request rejected"
                );
            }
        }

        result
    }

    /// Compute the total chargeable amount for a booking request
    pub fn quote(
        &self,
        product: &Product,
        quantity: u32,
        duration_units: u32,
        now: DateTime<Utc>,
    ) -> RulesResult<Quote> {
        let _timer = self.metrics.start_quote();
        PricingCalculator::quote(product, quantity, duration_units, now)
    }

    /// Split a confirmed booking's total between platform and agent
    pub fn split_commission(
        &self,
        total_price: Decimal,
        product: &Product,
        campaigns: &[Campaign],
        at: DateTime<Utc>,
    ) -> CommissionSplit {
        let _timer = self.metrics.start_split();

        let split = self.commission.split(total_price, product, campaigns, at);
        tracing::info!(
            product_id = %product.id,
            rate = %split.rate,
            platform_fee = %split.platform_fee,
            agent_net = %split.agent_net,
            "commission split computed"
        );
        split
    }

    /// Validate a flash-sale submission against its campaign
    pub fn validate_flash_sale(
        &self,
        sale: &FlashSale,
        campaign: Option<&Campaign>,
    ) -> RulesResult<()> {
        campaign::validate_flash_sale(sale, campaign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductKind;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn product() -> Product {
        Product {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            kind: ProductKind::Tour,
            price: dec!(150),
            currency: "USD".to_string(),
            capacity_per_unit: 1,
            daily_capacity: Some(10),
            blocked_dates: BTreeSet::new(),
            auto_blocked_dates: BTreeSet::new(),
            flash_sale: None,
        }
    }

    #[test]
    fn test_engine_counts_decisions() {
        let rules = MarketplaceRules::new(RulesConfig::default());
        let p = product();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        rules.admit(&p, date, 2, &[]).unwrap();
        rules.quote(&p, 2, 1, Utc::now()).unwrap();
        rules.split_commission(dec!(300), &p, &[], Utc::now());

        let summary = rules.metrics().summary();
        assert_eq!(summary.admission_checks, 1);
        assert_eq!(summary.quotes, 1);
        assert_eq!(summary.commission_splits, 1);
        assert_eq!(summary.admissions_rejected, 0);
    }

    #[test]
    fn test_engine_counts_rejections() {
        let rules = MarketplaceRules::new(RulesConfig::default());
        let mut p = product();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        p.blocked_dates.insert(date);

        assert!(rules.admit(&p, date, 1, &[]).is_err());
        assert_eq!(rules.metrics().summary().admissions_rejected, 1);
    }
}
