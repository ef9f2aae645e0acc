// Pricing Calculator
//
// Computes the total chargeable amount for a booking request from the base
// unit price, an optional live flash-sale override, and the quantity/duration
// shape of the product kind. No currency conversion happens here; the
// product's currency code passes through unchanged.

use crate::models::{Product, ProductKind};
use crate::rules::error::{RulesError, RulesResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Result of a pricing calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Price actually charged per unit, after any flash-sale override.
    pub unit_price: Decimal,
    /// Bookable units required to seat the requested quantity.
    /// For tours this equals the participant count.
    pub units_needed: u32,
    /// Nights (stay) or days (transport); always 1 for tours.
    pub duration_units: u32,
    pub total: Decimal,
    pub currency: String,
    /// Whether a live flash sale supplied the unit price.
    pub flash_sale_applied: bool,
}

/// Pricing Calculator
pub struct PricingCalculator;

impl PricingCalculator {
    /// Compute the total for a booking request
    ///
    /// Tours charge per participant with no duration multiplier. Stays and
    /// transport charge per bookable unit per duration unit, where a partial
    /// unit still requires a whole additional one. Zero quantity or duration
    /// is rejected outright, never clamped.
    pub fn quote(
        product: &Product,
        quantity: u32,
        duration_units: u32,
        now: DateTime<Utc>,
    ) -> RulesResult<Quote> {
        if quantity == 0 {
            return Err(RulesError::InvalidQuantity);
        }

        let (unit_price, flash_sale_applied) = Self::effective_unit_price(product, now);

        let (units_needed, duration_units) = match product.kind {
            ProductKind::Tour => (quantity, 1),
            ProductKind::Stay | ProductKind::Transport => {
                if duration_units == 0 {
                    return Err(RulesError::InvalidDuration);
                }
                (Self::units_needed(quantity, product.capacity_per_unit), duration_units)
            }
        };

        let total = unit_price * Decimal::from(units_needed) * Decimal::from(duration_units);

        Ok(Quote {
            unit_price,
            units_needed,
            duration_units,
            total,
            currency: product.currency.clone(),
            flash_sale_applied,
        })
    }

    /// Resolve the unit price, preferring a live flash sale over the base
    /// price
    pub fn effective_unit_price(product: &Product, now: DateTime<Utc>) -> (Decimal, bool) {
        match &product.flash_sale {
            Some(sale) if sale.is_live(now) => (sale.sale_price, true),
            _ => (product.price, false),
        }
    }

    /// Number of bookable units needed for the requested quantity, rounded up
    pub fn units_needed(quantity: u32, capacity_per_unit: u32) -> u32 {
        // Guard against malformed catalog data; one seat per unit is the
        // smallest sensible shape.
        let per_unit = capacity_per_unit.max(1);
        quantity.div_ceil(per_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlashSale, FlashSaleStatus};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn product(kind: ProductKind, price: Decimal, capacity_per_unit: u32) -> Product {
        Product {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            kind,
            price,
            currency: "USD".to_string(),
            capacity_per_unit,
            daily_capacity: None,
            blocked_dates: BTreeSet::new(),
            auto_blocked_dates: BTreeSet::new(),
            flash_sale: None,
        }
    }

    fn approved_sale(sale_price: Decimal, end_time: Option<DateTime<Utc>>) -> FlashSale {
        FlashSale {
            sale_price,
            original_price: dec!(150),
            discount_percentage: dec!(20),
            status: FlashSaleStatus::Approved,
            end_time,
            campaign_id: None,
            approved_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_tour_total_ignores_duration() {
        let p = product(ProductKind::Tour, dec!(150), 1);
        let quote = PricingCalculator::quote(&p, 2, 7, Utc::now()).unwrap();

        assert_eq!(quote.total, dec!(300));
        assert_eq!(quote.duration_units, 1);
        assert_eq!(quote.units_needed, 2);
        assert!(!quote.flash_sale_applied);
    }

    #[test]
    fn test_flash_sale_price_wins_for_tour() {
        let mut p = product(ProductKind::Tour, dec!(150), 1);
        p.flash_sale = Some(approved_sale(dec!(120), None));

        let quote = PricingCalculator::quote(&p, 2, 1, Utc::now()).unwrap();
        assert_eq!(quote.total, dec!(240));
        assert!(quote.flash_sale_applied);
    }

    #[test]
    fn test_expired_flash_sale_falls_back_to_base_price() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let ended = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let mut p = product(ProductKind::Tour, dec!(150), 1);
        p.flash_sale = Some(approved_sale(dec!(120), Some(ended)));

        let quote = PricingCalculator::quote(&p, 1, 1, now).unwrap();
        assert_eq!(quote.total, dec!(150));
        assert!(!quote.flash_sale_applied);
    }

    #[test]
    fn test_pending_sale_does_not_discount() {
        let mut p = product(ProductKind::Tour, dec!(150), 1);
        p.flash_sale = Some(FlashSale {
            status: FlashSaleStatus::Pending,
            ..approved_sale(dec!(120), None)
        });

        let quote = PricingCalculator::quote(&p, 1, 1, Utc::now()).unwrap();
        assert_eq!(quote.unit_price, dec!(150));
    }

    #[test]
    fn test_stay_charges_units_times_nights() {
        // 5 guests in 2-bed rooms need 3 rooms; 3 nights at 100.
        let p = product(ProductKind::Stay, dec!(100), 2);
        let quote = PricingCalculator::quote(&p, 5, 3, Utc::now()).unwrap();

        assert_eq!(quote.units_needed, 3);
        assert_eq!(quote.total, dec!(900));
    }

    #[test]
    fn test_transport_charges_units_times_days() {
        // 9 passengers in 4-seat vehicles need 3 vehicles for 2 days.
        let p = product(ProductKind::Transport, dec!(80), 4);
        let quote = PricingCalculator::quote(&p, 9, 2, Utc::now()).unwrap();

        assert_eq!(quote.units_needed, 3);
        assert_eq!(quote.total, dec!(480));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let p = product(ProductKind::Tour, dec!(150), 1);
        assert_eq!(
            PricingCalculator::quote(&p, 0, 1, Utc::now()),
            Err(RulesError::InvalidQuantity)
        );
    }

    #[test]
    fn test_zero_duration_rejected_for_stay() {
        let p = product(ProductKind::Stay, dec!(100), 2);
        assert_eq!(
            PricingCalculator::quote(&p, 2, 0, Utc::now()),
            Err(RulesError::InvalidDuration)
        );
    }

    #[test]
    fn test_currency_passthrough() {
        let mut p = product(ProductKind::Tour, dec!(150), 1);
        p.currency = "EUR".to_string();

        let quote = PricingCalculator::quote(&p, 1, 1, Utc::now()).unwrap();
        assert_eq!(quote.currency, "EUR");
    }

    #[test]
    fn test_units_needed_rounds_up() {
        assert_eq!(PricingCalculator::units_needed(5, 2), 3);
        assert_eq!(PricingCalculator::units_needed(4, 2), 2);
        assert_eq!(PricingCalculator::units_needed(1, 8), 1);
        // Malformed capacity treated as one seat per unit.
        assert_eq!(PricingCalculator::units_needed(3, 0), 3);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::models::{FlashSale, FlashSaleStatus};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn stay_product(price_cents: u32, capacity_per_unit: u32) -> Product {
        Product {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            kind: ProductKind::Stay,
            price: Decimal::from(price_cents) / Decimal::from(100),
            currency: "USD".to_string(),
            capacity_per_unit,
            daily_capacity: None,
            blocked_dates: BTreeSet::new(),
            auto_blocked_dates: BTreeSet::new(),
            flash_sale: None,
        }
    }

    /// Ceiling division: the unit count covers the quantity, and removing one
    /// unit would not.
    #[test]
    fn prop_units_needed_is_exact_ceiling() {
        proptest!(|(quantity in 1u32..=10_000, per_unit in 1u32..=100)| {
            let units = PricingCalculator::units_needed(quantity, per_unit);
            prop_assert!(units * per_unit >= quantity);
            prop_assert!((units - 1) * per_unit < quantity);
        });
    }

    /// Totals are always positive and equal unit_price * units * duration.
    #[test]
    fn prop_quote_total_matches_components() {
        proptest!(|(
            quantity in 1u32..=200,
            duration in 1u32..=30,
            price_cents in 1u32..=100_000,
            per_unit in 1u32..=20
        )| {
            let p = stay_product(price_cents, per_unit);
            let quote = PricingCalculator::quote(&p, quantity, duration, Utc::now()).unwrap();

            let expected = quote.unit_price
                * Decimal::from(quote.units_needed)
                * Decimal::from(quote.duration_units);
            prop_assert_eq!(quote.total, expected);
            prop_assert!(quote.total > Decimal::ZERO);
        });
    }

    /// With a live approved sale, the sale price is used no matter the
    /// request shape.
    #[test]
    fn prop_live_flash_sale_always_dominates() {
        proptest!(|(quantity in 1u32..=100, duration in 1u32..=14)| {
            let mut p = stay_product(10_000, 2);
            p.flash_sale = Some(FlashSale {
                sale_price: dec!(60),
                original_price: dec!(100),
                discount_percentage: dec!(40),
                status: FlashSaleStatus::Approved,
                end_time: None,
                campaign_id: None,
                approved_at: None,
            });

            let quote = PricingCalculator::quote(&p, quantity, duration, Utc::now()).unwrap();
            prop_assert!(quote.flash_sale_applied);
            prop_assert_eq!(quote.unit_price, dec!(60));
        });
    }
}
