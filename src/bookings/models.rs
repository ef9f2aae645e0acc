use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Booking status enum representing the lifecycle of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Parse status from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reservation instance anchored to a single calendar date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    /// Unit count; guests for tours and stays, passengers for transport.
    pub quantity: u32,
    pub date: NaiveDate,
    /// Nights (stay) or days (transport); 1 for tours.
    pub duration_units: u32,
    pub total_price: Decimal,
    pub currency: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Create a new pending booking
    pub fn new(
        product_id: Uuid,
        user_id: Uuid,
        quantity: u32,
        date: NaiveDate,
        duration_units: u32,
        total_price: Decimal,
        currency: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            product_id,
            user_id,
            quantity,
            date,
            duration_units,
            total_price,
            currency,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request DTO for creating a booking
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub product_id: Uuid,
    pub date: NaiveDate,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    /// Nights or days for stay/transport products; ignored for tours.
    #[validate(range(min = 1, message = "Duration must be at least 1"))]
    pub duration_units: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert_eq!(BookingStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(BookingStatus::from_str("refunded").is_err());
    }

    #[test]
    fn test_new_booking_starts_pending() {
        let booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            2,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            1,
            dec!(300),
            "USD".to_string(),
        );

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.quantity, 2);
    }

    #[test]
    fn test_request_validation() {
        let valid = CreateBookingRequest {
            product_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            quantity: 2,
            duration_units: Some(3),
        };
        assert!(valid.validate().is_ok());

        let zero_quantity = CreateBookingRequest {
            quantity: 0,
            ..valid.clone()
        };
        assert!(zero_quantity.validate().is_err());

        let zero_duration = CreateBookingRequest {
            duration_units: Some(0),
            ..valid
        };
        assert!(zero_duration.validate().is_err());
    }
}
