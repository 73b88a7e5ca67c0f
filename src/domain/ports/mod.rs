use crate::domain::models::{
    booking::{Booking, BookingFilter},
    settings::BookingSettings,
};
use crate::error::AppError;
use async_trait::async_trait;

pub use crate::domain::services::timezone::Clock;

/// Document-store contract for the bookings collection.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Matching bookings ordered by date, then time.
    async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError>;
    async fn find_one(&self, id: &str) -> Result<Option<Booking>, AppError>;
    /// Fails with `AppError::Conflict` when another non-cancelled booking
    /// already holds the same date and time.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// The singleton settings record. `load` yields `None` until an
/// administrator saves settings for the first time.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load(&self) -> Result<Option<BookingSettings>, AppError>;
    async fn save(&self, settings: &BookingSettings) -> Result<BookingSettings, AppError>;
}
