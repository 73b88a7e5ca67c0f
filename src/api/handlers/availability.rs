use axum::{extract::{rejection::QueryRejection, Query, State}, response::IntoResponse, Json};
use chrono::{Days, NaiveDate};
use std::sync::Arc;

use crate::api::dtos::requests::{AvailabilityQuery, DatesQuery};
use crate::api::dtos::responses::{ApiResponse, SlotsResponse};
use crate::domain::services::fallback::DataSource;
use crate::domain::services::timezone;
use crate::error::AppError;
use crate::state::AppState;

/// Longest range `/availability/dates` evaluates in one request.
pub const MAX_DATE_RANGE_DAYS: u64 = 92;

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let raw = query.date.ok_or_else(|| AppError::Validation("date is required".into()))?;
    let date = timezone::parse_date_string(&raw)?;

    let slots = state.resolver().available_slots(date).await;
    Ok(Json(ApiResponse::sourced(slots.map(|slots| SlotsResponse {
        date: date.format("%Y-%m-%d").to_string(),
        slots,
    }))))
}

pub async fn get_available_dates(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DatesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let resolver = state.resolver();

    let from = match query.from.as_deref() {
        Some(raw) => timezone::parse_date_string(raw)?,
        None => state.clock.today(),
    };
    let (to, window_source) = match query.to.as_deref() {
        Some(raw) => (timezone::parse_date_string(raw)?, DataSource::Database),
        None => {
            let loaded = state.reader().load_settings().await;
            let horizon = loaded.data.effective().max_advance_days.max(0) as u64;
            let to = state
                .clock
                .today()
                .checked_add_days(Days::new(horizon))
                .unwrap_or(NaiveDate::MAX);
            (to, loaded.source)
        }
    };

    if to < from {
        return Err(AppError::Validation(format!("'to' ({}) is before 'from' ({})", to, from)));
    }
    let to = from
        .checked_add_days(Days::new(MAX_DATE_RANGE_DAYS - 1))
        .map_or(to, |cap| to.min(cap));

    let mut dates = resolver.available_dates(from, to).await;
    dates.source = dates.source.and(window_source);
    Ok(Json(ApiResponse::sourced(dates.map(|dates| {
        dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>()
    }))))
}
