// Error types for the booking rules engines
// Every variant is a rejected operation reported to the immediate caller;
// none is a process fault and none needs retry handling.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the rules engines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesError {
    /// The requested date is explicitly blocked for the product.
    /// Recoverable by the caller, typically by offering alternative dates.
    #[error("date {0} is unavailable for booking")]
    DateUnavailable(NaiveDate),

    /// Quantity was zero. Surfaced immediately as a caller input bug.
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    /// Duration was zero for a stay or transport product.
    #[error("duration must be at least one night or day")]
    InvalidDuration,

    /// A flash-sale submission's discount falls short of the campaign floor.
    /// Rejected at submission time, before any booking computation runs.
    #[error("flash sale discount {submitted}% is below the campaign minimum of {minimum}%")]
    CampaignDiscountBelowMinimum {
        submitted: Decimal,
        minimum: Decimal,
    },
}

/// Result type alias for rules operations
pub type RulesResult<T> = Result<T, RulesError>;
