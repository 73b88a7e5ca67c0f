use serde::Serialize;

use crate::domain::models::settings::BookingSettings;
use crate::domain::services::fallback::{DataSource, Sourced};
use crate::domain::services::scheduling::Slot;

/// Success envelope shared by every `/api` route.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DataSource>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data, source: None }
    }

    pub fn sourced(sourced: Sourced<T>) -> Self {
        Self { success: true, data: sourced.data, source: Some(sourced.source) }
    }
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub slots: Vec<Slot>,
}

#[derive(Serialize)]
pub struct SettingsResponse {
    #[serde(flatten)]
    pub settings: BookingSettings,
    pub configured: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
