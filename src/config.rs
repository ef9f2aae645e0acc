// Configuration for the booking rules core
//
// Both knobs exist so behavior that the reference embedded as literals can be
// tuned per deployment: the platform commission rate, and what happens to
// auto-blocked dates when a contributing booking is cancelled.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Commission settings
///
/// `default_rate` is the fraction of a confirmed booking's total retained by
/// the platform when no campaign override applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionConfig {
    pub default_rate: Decimal,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            // 11%
            default_rate: Decimal::new(11, 2),
        }
    }
}

/// What cancellation does to auto-blocked dates
///
/// The reference behavior never releases a blocked date once capacity filled,
/// even when the booking that filled it is cancelled. That reading is likely a
/// bug upstream, so the alternative is kept behind this flag rather than baked
/// in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Reference behavior: blocked dates stay blocked.
    KeepDateBlocked,
    /// Re-open an auto-blocked date when the running total drops back below
    /// capacity. Manual blocks are never touched.
    ReleaseCapacity,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        CancellationPolicy::KeepDateBlocked
    }
}

/// Top-level configuration handed to the rules engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    pub commission: CommissionConfig,
    pub cancellation: CancellationPolicy,
}
