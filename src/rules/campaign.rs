// Campaign participation rules
//
// Catalog-time checks for flash sales joining a campaign. These run at
// submission, before any booking computation ever touches the sale.

use crate::models::{Campaign, FlashSale};
use crate::rules::error::{RulesError, RulesResult};

/// Validate a flash-sale submission against the campaign it wants to join
///
/// A sale outside any campaign is always acceptable here; a participating
/// sale must meet or exceed the campaign's minimum discount.
pub fn validate_flash_sale(sale: &FlashSale, campaign: Option<&Campaign>) -> RulesResult<()> {
    let Some(campaign) = campaign else {
        return Ok(());
    };

    if sale.discount_percentage < campaign.min_discount {
        return Err(RulesError::CampaignDiscountBelowMinimum {
            submitted: sale.discount_percentage,
            minimum: campaign.min_discount,
        });
    }

    Ok(())
}
