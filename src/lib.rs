// Voyago Core
//
// Booking rules library for a travel marketplace: availability admission,
// pricing, and commission splitting over a shared product/booking/campaign
// data model. This crate is a pure in-process computation core; HTTP handlers,
// persistence drivers, and UI concerns live in the surrounding application.

pub mod bookings;
pub mod config;
pub mod models;
pub mod rules;
pub mod validation;


// Re-export the types callers touch most often.
pub use bookings::{
    Booking, BookingError, BookingService, BookingStatus, CreateBookingRequest,
};
pub use config::{CancellationPolicy, CommissionConfig, RulesConfig};
pub use models::{Campaign, FlashSale, FlashSaleStatus, Product, ProductKind};
pub use rules::{
    AvailabilityDecision, CommissionSplit, MarketplaceRules, Quote, RulesError, RulesResult,
};
