use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::{BookingQuery, CreateBookingRequest, UpdateBookingRequest};
use crate::api::dtos::responses::ApiResponse;
use crate::api::extractors::admin::{AdminUser, MaybeAdmin};
use crate::domain::models::booking::{Booking, BookingFilter, OccupiedSlot};
use crate::domain::services::calendar::generate_ics;
use crate::domain::services::conflict::PolicyCheck;
use crate::domain::services::fallback::{DataSource, Sourced};
use crate::domain::services::scheduling::end_time_for;
use crate::domain::services::timezone;
use crate::error::AppError;
use crate::state::AppState;

/// `?available=true&date=` is the public occupancy view; anything else
/// lists full records and needs the admin token.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    MaybeAdmin(admin): MaybeAdmin,
    query: Result<Query<BookingQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let date = query.date.as_deref().map(timezone::parse_date_string).transpose()?;

    if query.available.unwrap_or(false) {
        let date = date.ok_or_else(|| AppError::Validation("date is required when available=true".into()))?;
        let booked = state.reader().find_bookings(&BookingFilter::active_on(date)).await;
        let occupied = booked.map(|rows| rows.iter().map(OccupiedSlot::from).collect::<Vec<_>>());
        return Ok(Json(ApiResponse::sourced(occupied)).into_response());
    }

    if admin.is_none() {
        return Err(AppError::Unauthorized);
    }

    let filter = BookingFilter {
        status: query.status,
        ..date.map(BookingFilter::on).unwrap_or_default()
    };
    let bookings = state.reader().find_bookings(&filter).await;
    Ok(Json(ApiResponse::sourced(bookings)).into_response())
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    MaybeAdmin(admin): MaybeAdmin,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let policy = match admin {
        Some(_) => PolicyCheck::Override,
        None => PolicyCheck::Enforce,
    };

    let booking = state.resolver().create(payload.into(), policy).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let found = state.reader().find_booking(&id).await;
    let booking = match found.data {
        Some(booking) => booking,
        None if found.source == DataSource::Sample => {
            return Err(AppError::NotFound(format!(
                "Booking {} is not in the sample data served while the booking store is unavailable",
                id
            )));
        }
        None => return Err(AppError::NotFound(format!("Booking {} not found", id))),
    };

    Ok(Json(ApiResponse::sourced(Sourced { data: booking, source: found.source })))
}

fn required(field: &str, value: String) -> Result<String, AppError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(value)
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn valid_time(field: &str, value: &str) -> Result<String, AppError> {
    timezone::normalize_time(value)
        .ok_or_else(|| AppError::Validation(format!("Invalid {} '{}', expected HH:MM", field, value)))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(patch) = payload?;

    let mut booking: Booking = state
        .booking_repo
        .find_one(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

    let previous_date = booking.kst_date();
    let previous_time = booking.time.clone();

    if let Some(next) = patch.status {
        if !booking.status.can_transition_to(next) {
            warn!("Rejected status change for {}: {} -> {}", id, booking.status, next);
            return Err(AppError::Validation(format!(
                "Cannot change status from {} to {}",
                booking.status, next
            )));
        }
        booking.status = next;
    }

    if let Some(date) = patch.date {
        booking.date = timezone::normalize_booking_date(timezone::parse_date_string(&date)?);
    }
    if let Some(time) = patch.time {
        booking.time = valid_time("time", &time)?;
    }
    match patch.end_time {
        Some(end) => booking.end_time = valid_time("endTime", &end)?,
        None if booking.time != previous_time => {
            let settings = state.resolver().current_settings().await?;
            booking.end_time = end_time_for(&settings, &booking.time)
                .ok_or_else(|| AppError::Internal(format!("Cannot derive end time for {}", booking.time)))?;
        }
        None => {}
    }
    if let Some(service) = patch.service {
        booking.service = required("service", service)?;
    }
    if let Some(customer) = patch.customer {
        if let Some(name) = customer.name {
            booking.customer.name = required("customer.name", name)?;
        }
        if let Some(email) = customer.email {
            let email = required("customer.email", email)?;
            if !email.contains('@') {
                return Err(AppError::Validation("customer.email is not a valid email address".into()));
            }
            booking.customer.email = email;
        }
        if let Some(phone) = customer.phone {
            booking.customer.phone = required("customer.phone", phone)?;
        }
        if let Some(company) = customer.company {
            booking.customer.company = optional(company);
        }
    }
    if let Some(notes) = patch.notes {
        booking.notes = optional(notes);
    }

    let moved = booking.kst_date() != previous_date || booking.time != previous_time;
    if moved && booking.status.is_active() {
        state
            .resolver()
            .ensure_slot_free(booking.kst_date(), &booking.time, Some(&booking.id))
            .await?;
    }

    booking.updated_at = state.clock.utc_now();
    let updated = state.booking_repo.update(&booking).await?;
    info!("Booking updated: {} ({} {} {})", updated.id, updated.kst_date(), updated.time, updated.status);

    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.booking_repo.delete(&id).await?;
    info!("Booking deleted: {}", id);
    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}

pub async fn export_booking_ics(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_one(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

    let ics = generate_ics(&booking)
        .ok_or_else(|| AppError::Internal(format!("Booking {} has an unreadable slot time", id)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"booking-{}.ics\"", id)),
        ],
        ics,
    ))
}
