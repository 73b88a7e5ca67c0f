use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::domain::models::settings::BookingSettings;
use crate::error::AppError;

/// `booking_settings` row; list columns hold JSON arrays.
#[derive(Debug, FromRow)]
pub struct SettingsRow {
    pub available_times: String,
    pub blocked_dates: String,
    pub blocked_weekdays: String,
    pub min_advance_hours: i64,
    pub max_advance_days: i64,
    pub slot_duration: i64,
    pub updated_at: DateTime<Utc>,
}

fn decode<T: serde::de::DeserializeOwned>(column: &str, raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw).map_err(|e| {
        AppError::Store(sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    })
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|e| AppError::Internal(format!("Cannot encode settings: {}", e)))
}

impl TryFrom<SettingsRow> for BookingSettings {
    type Error = AppError;

    fn try_from(row: SettingsRow) -> Result<Self, Self::Error> {
        Ok(BookingSettings {
            available_times: decode("available_times", &row.available_times)?,
            blocked_dates: decode::<Vec<NaiveDate>>("blocked_dates", &row.blocked_dates)?,
            blocked_weekdays: decode("blocked_weekdays", &row.blocked_weekdays)?,
            min_advance_hours: row.min_advance_hours,
            max_advance_days: row.max_advance_days,
            slot_duration: row.slot_duration,
            updated_at: Some(row.updated_at),
        })
    }
}

/// JSON-encoded list columns, in table order.
pub struct EncodedLists {
    pub available_times: String,
    pub blocked_dates: String,
    pub blocked_weekdays: String,
}

impl EncodedLists {
    pub fn of(settings: &BookingSettings) -> Result<Self, AppError> {
        Ok(Self {
            available_times: encode(&settings.available_times)?,
            blocked_dates: encode(&settings.blocked_dates)?,
            blocked_weekdays: encode(&settings.blocked_weekdays)?,
        })
    }
}
