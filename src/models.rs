// Catalog domain models
//
// Products, flash sales, and campaigns shared by all three rule engines.
// Bookings live in the bookings module alongside their lifecycle logic.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Kind of bookable listing
///
/// Determines how the pricing calculator interprets quantity and duration:
/// tours charge per participant, stays and transport charge per unit per
/// duration unit (nights or days).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Tour,
    Stay,
    Transport,
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductKind::Tour => write!(f, "tour"),
            ProductKind::Stay => write!(f, "stay"),
            ProductKind::Transport => write!(f, "transport"),
        }
    }
}

impl std::str::FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tour" => Ok(ProductKind::Tour),
            "stay" => Ok(ProductKind::Stay),
            "transport" => Ok(ProductKind::Transport),
            _ => Err(format!("Invalid product kind: {}", s)),
        }
    }
}

/// Approval lifecycle of a flash sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashSaleStatus {
    Pending,
    Approved,
    Rejected,
    Ended,
}

impl fmt::Display for FlashSaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashSaleStatus::Pending => write!(f, "pending"),
            FlashSaleStatus::Approved => write!(f, "approved"),
            FlashSaleStatus::Rejected => write!(f, "rejected"),
            FlashSaleStatus::Ended => write!(f, "ended"),
        }
    }
}

/// Admin-approved discounted price override for a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashSale {
    pub sale_price: Decimal,
    pub original_price: Decimal,
    pub discount_percentage: Decimal,
    pub status: FlashSaleStatus,
    pub end_time: Option<DateTime<Utc>>,
    pub campaign_id: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl FlashSale {
    /// Whether the sale price is in effect at the given instant
    ///
    /// Only an approved sale with no end time, or one whose end time has not
    /// passed, overrides the base price.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == FlashSaleStatus::Approved
            && self.end_time.map_or(true, |end| now < end)
    }
}

/// Request DTO for an agent submitting a flash sale
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFlashSaleRequest {
    #[validate(custom = "crate::validation::validate_positive_amount")]
    pub sale_price: Decimal,
    #[validate(custom = "crate::validation::validate_positive_amount")]
    pub original_price: Decimal,
    #[validate(custom = "crate::validation::validate_percentage")]
    pub discount_percentage: Decimal,
    pub end_time: Option<DateTime<Utc>>,
    pub campaign_id: Option<Uuid>,
}

impl CreateFlashSaleRequest {
    /// Build the pending flash sale record awaiting admin approval
    pub fn into_flash_sale(self) -> FlashSale {
        FlashSale {
            sale_price: self.sale_price,
            original_price: self.original_price,
            discount_percentage: self.discount_percentage,
            status: FlashSaleStatus::Pending,
            end_time: self.end_time,
            campaign_id: self.campaign_id,
            approved_at: None,
        }
    }
}

/// A bookable listing owned by an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub kind: ProductKind,
    pub price: Decimal,
    pub currency: String,
    /// Seats or beds per bookable unit. Always at least 1.
    pub capacity_per_unit: u32,
    /// Maximum aggregate quantity bookable per calendar date.
    /// None or zero means unlimited.
    pub daily_capacity: Option<u32>,
    /// Dates blocked by the owning agent.
    pub blocked_dates: BTreeSet<NaiveDate>,
    /// Dates blocked by the availability engine once capacity filled.
    /// Kept apart from manual blocks so the cancellation policy can release
    /// them without touching agent decisions.
    pub auto_blocked_dates: BTreeSet<NaiveDate>,
    pub flash_sale: Option<FlashSale>,
}

impl Product {
    /// A date is unavailable when it sits in either blocked set
    pub fn is_date_blocked(&self, date: NaiveDate) -> bool {
        self.blocked_dates.contains(&date) || self.auto_blocked_dates.contains(&date)
    }

    /// Whether per-date capacity accounting applies to this product
    pub fn capacity_enforced(&self) -> bool {
        matches!(self.daily_capacity, Some(cap) if cap > 0)
    }
}

/// Platform-wide promotional event flash sales can join
///
/// Participation grants a reduced commission rate in exchange for meeting the
/// campaign's minimum discount requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    /// First day of the campaign window, inclusive.
    pub start_date: NaiveDate,
    /// Last day of the campaign window, inclusive.
    pub end_date: NaiveDate,
    /// Percentage floor a participating sale's discount must meet or exceed.
    pub min_discount: Decimal,
    /// Commission rate (as a percentage) overriding the platform default.
    pub admin_fee_percentage: Decimal,
}

impl Campaign {
    /// Whether the campaign window covers the given date (inclusive bounds)
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sale(status: FlashSaleStatus, end_time: Option<DateTime<Utc>>) -> FlashSale {
        FlashSale {
            sale_price: dec!(120),
            original_price: dec!(150),
            discount_percentage: dec!(20),
            status,
            end_time,
            campaign_id: None,
            approved_at: None,
        }
    }

    #[test]
    fn test_product_kind_round_trip() {
        use std::str::FromStr;

        for kind in [ProductKind::Tour, ProductKind::Stay, ProductKind::Transport] {
            assert_eq!(ProductKind::from_str(&kind.to_string()).unwrap(), kind);
        }
        assert!(ProductKind::from_str("cruise").is_err());
    }

    #[test]
    fn test_flash_sale_live_when_approved_without_end_time() {
        let now = Utc::now();
        assert!(sale(FlashSaleStatus::Approved, None).is_live(now));
    }

    #[test]
    fn test_flash_sale_not_live_when_pending_or_rejected() {
        let now = Utc::now();
        assert!(!sale(FlashSaleStatus::Pending, None).is_live(now));
        assert!(!sale(FlashSaleStatus::Rejected, None).is_live(now));
        assert!(!sale(FlashSaleStatus::Ended, None).is_live(now));
    }

    #[test]
    fn test_flash_sale_expires_at_end_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let before_end = sale(
            FlashSaleStatus::Approved,
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()),
        );
        let past_end = sale(
            FlashSaleStatus::Approved,
            Some(Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap()),
        );

        assert!(before_end.is_live(now));
        assert!(!past_end.is_live(now));
    }

    #[test]
    fn test_campaign_window_is_inclusive() {
        let campaign = Campaign {
            id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            min_discount: dec!(10),
            admin_fee_percentage: dec!(5),
        };

        assert!(campaign.is_active_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(campaign.is_active_on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()));
        assert!(!campaign.is_active_on(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!campaign.is_active_on(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()));
    }

    #[test]
    fn test_flash_sale_request_validation() {
        let valid = CreateFlashSaleRequest {
            sale_price: dec!(120),
            original_price: dec!(150),
            discount_percentage: dec!(20),
            end_time: None,
            campaign_id: None,
        };
        assert!(valid.validate().is_ok());

        let zero_price = CreateFlashSaleRequest {
            sale_price: dec!(0),
            ..valid.clone()
        };
        assert!(zero_price.validate().is_err());

        let bad_discount = CreateFlashSaleRequest {
            discount_percentage: dec!(120),
            ..valid
        };
        assert!(bad_discount.validate().is_err());
    }

    #[test]
    fn test_flash_sale_submission_starts_pending() {
        let request = CreateFlashSaleRequest {
            sale_price: dec!(120),
            original_price: dec!(150),
            discount_percentage: dec!(20),
            end_time: None,
            campaign_id: Some(Uuid::new_v4()),
        };

        let sale = request.into_flash_sale();
        assert_eq!(sale.status, FlashSaleStatus::Pending);
        assert!(sale.approved_at.is_none());
    }
}
