use serde::Deserialize;

use crate::domain::models::booking::BookingStatus;
use crate::domain::models::settings::{
    BookingSettings, DEFAULT_MAX_ADVANCE_DAYS, DEFAULT_MIN_ADVANCE_HOURS, DEFAULT_SLOT_DURATION,
};
use crate::domain::services::conflict::{BookingDraft, CustomerDraft};
use crate::domain::services::timezone;
use crate::error::AppError;

#[derive(Deserialize, Default)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub end_time: Option<String>,
    pub service: Option<String>,
    pub customer: Option<CustomerInput>,
    pub notes: Option<String>,
}

impl From<CreateBookingRequest> for BookingDraft {
    fn from(req: CreateBookingRequest) -> Self {
        BookingDraft {
            date: req.date,
            time: req.time,
            end_time: req.end_time,
            service: req.service,
            customer: req.customer.map(|c| CustomerDraft {
                name: c.name,
                email: c.email,
                phone: c.phone,
                company: c.company,
            }),
            notes: req.notes,
        }
    }
}

/// Partial update; absent fields are left untouched. An empty `notes` or
/// `customer.company` clears the value.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub end_time: Option<String>,
    pub service: Option<String>,
    pub customer: Option<CustomerInput>,
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct BookingQuery {
    pub available: Option<bool>,
    pub date: Option<String>,
    pub status: Option<BookingStatus>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct DatesQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Full replacement of the settings singleton. Omitted fields take the
/// documented defaults.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsRequest {
    pub available_times: Vec<String>,
    pub blocked_dates: Vec<String>,
    pub blocked_weekdays: Vec<i64>,
    pub min_advance_hours: i64,
    pub max_advance_days: i64,
    pub slot_duration: i64,
}

impl Default for SettingsRequest {
    fn default() -> Self {
        let defaults = BookingSettings::default();
        Self {
            available_times: defaults.available_times,
            blocked_dates: Vec::new(),
            blocked_weekdays: Vec::new(),
            min_advance_hours: DEFAULT_MIN_ADVANCE_HOURS,
            max_advance_days: DEFAULT_MAX_ADVANCE_DAYS,
            slot_duration: DEFAULT_SLOT_DURATION,
        }
    }
}

impl TryFrom<SettingsRequest> for BookingSettings {
    type Error = AppError;

    fn try_from(req: SettingsRequest) -> Result<Self, Self::Error> {
        let blocked_dates = req
            .blocked_dates
            .iter()
            .map(|d| {
                chrono::NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                    .map_err(|_| AppError::Validation(format!("blockedDates: '{}' is not a YYYY-MM-DD date", d)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let blocked_weekdays = req
            .blocked_weekdays
            .iter()
            .map(|d| {
                u8::try_from(*d)
                    .ok()
                    .filter(|d| *d <= 6)
                    .ok_or_else(|| AppError::Validation(format!("blockedWeekdays: {} is not a weekday index (0-6)", d)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut available_times = Vec::with_capacity(req.available_times.len());
        for time in req.available_times {
            let canonical = timezone::normalize_time(&time)
                .ok_or_else(|| AppError::Validation(format!("availableTimes: '{}' is not a valid HH:MM time", time)))?;
            available_times.push(canonical);
        }

        Ok(BookingSettings {
            available_times,
            blocked_dates,
            blocked_weekdays,
            min_advance_hours: req.min_advance_hours,
            max_advance_days: req.max_advance_days,
            slot_duration: req.slot_duration,
            updated_at: None,
        })
    }
}
