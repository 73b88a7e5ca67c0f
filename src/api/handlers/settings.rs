use axum::{extract::{rejection::JsonRejection, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::SettingsRequest;
use crate::api::dtos::responses::{ApiResponse, SettingsResponse};
use crate::api::extractors::admin::AdminUser;
use crate::domain::models::settings::BookingSettings;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let loaded = state.reader().load_settings().await;
    let response = loaded.map(|s| SettingsResponse {
        configured: s.is_configured(),
        settings: s.effective(),
    });
    Ok(Json(ApiResponse::sourced(response)))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let mut settings = BookingSettings::try_from(payload)?;
    settings.normalize();
    settings.validate()?;
    settings.updated_at = Some(state.clock.utc_now());

    let saved = state.settings_repo.save(&settings).await?;
    info!(
        "Booking settings replaced: {} times, {} blocked dates, weekdays {:?}",
        saved.available_times.len(),
        saved.blocked_dates.len(),
        saved.blocked_weekdays
    );

    Ok(Json(ApiResponse::ok(SettingsResponse { settings: saved, configured: true })))
}
