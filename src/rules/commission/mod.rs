// Commission Splitter
//
// Splits a confirmed booking's total between the platform fee and the agent's
// net earnings. Campaign-backed flash sales earn a reduced rate; everything
// else pays the configured platform default.

use crate::config::CommissionConfig;
use crate::models::{Campaign, Product};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Commission split for one confirmed booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionSplit {
    /// Rate actually applied, as a fraction (0.11 = 11%).
    pub rate: Decimal,
    pub platform_fee: Decimal,
    pub agent_net: Decimal,
    /// Campaign that supplied the override rate, if any.
    pub campaign_id: Option<Uuid>,
}

/// Commission Splitter
pub struct CommissionSplitter {
    config: CommissionConfig,
}

impl CommissionSplitter {
    /// Create a new CommissionSplitter
    pub fn new(config: CommissionConfig) -> Self {
        Self { config }
    }

    /// Split a booking total into platform fee and agent net
    ///
    /// The campaign override applies when the product carries an approved
    /// flash sale tied to a campaign whose window covered the sale's approval
    /// time. When no approval timestamp was recorded, the evaluation instant
    /// is used instead.
    pub fn split(
        &self,
        total_price: Decimal,
        product: &Product,
        campaigns: &[Campaign],
        at: DateTime<Utc>,
    ) -> CommissionSplit {
        let (rate, campaign_id) = self
            .campaign_rate(product, campaigns, at)
            .unwrap_or((self.config.default_rate, None));

        let platform_fee = total_price * rate;
        let agent_net = total_price - platform_fee;

        CommissionSplit {
            rate,
            platform_fee,
            agent_net,
            campaign_id,
        }
    }

    /// Resolve the campaign override rate, if one applies
    fn campaign_rate(
        &self,
        product: &Product,
        campaigns: &[Campaign],
        at: DateTime<Utc>,
    ) -> Option<(Decimal, Option<Uuid>)> {
        let sale = product.flash_sale.as_ref()?;
        if sale.status != crate::models::FlashSaleStatus::Approved {
            return None;
        }

        let campaign_id = sale.campaign_id?;
        let campaign = campaigns.iter().find(|c| c.id == campaign_id)?;

        let reference_date = sale
            .approved_at
            .map(|t| t.date_naive())
            .unwrap_or_else(|| at.date_naive());

        if campaign.is_active_on(reference_date) {
            let rate = campaign.admin_fee_percentage / Decimal::from(100);
            Some((rate, Some(campaign.id)))
        } else {
            None
        }
    }
}
