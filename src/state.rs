use std::sync::Arc;
use crate::domain::ports::{BookingRepository, Clock, SettingsRepository};
use crate::domain::services::{conflict::ConflictResolver, fallback::FallbackReader};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Read paths: degrade to sample data on store failure.
    pub fn reader(&self) -> FallbackReader {
        FallbackReader::new(self.booking_repo.clone(), self.settings_repo.clone())
    }

    pub fn resolver(&self) -> ConflictResolver {
        ConflictResolver::new(self.booking_repo.clone(), self.settings_repo.clone(), self.clock.clone())
    }
}
