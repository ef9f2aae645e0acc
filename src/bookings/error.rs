use crate::rules::RulesError;
use uuid::Uuid;

/// Error types for booking operations
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found")]
    NotFound,

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Repository or ledger failure surfaced by a storage backend.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Rules(#[from] RulesError),
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(err: validator::ValidationErrors) -> Self {
        BookingError::ValidationError(err.to_string())
    }
}
