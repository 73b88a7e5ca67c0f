use serde::{Deserialize, Serialize};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::HashSet;

use crate::domain::services::timezone;
use crate::error::AppError;

pub const DEFAULT_AVAILABLE_TIMES: [&str; 8] = [
    "09:00", "10:00", "11:00", "13:00", "14:00", "15:00", "16:00", "17:00",
];
pub const DEFAULT_MIN_ADVANCE_HOURS: i64 = 24;
pub const DEFAULT_MAX_ADVANCE_DAYS: i64 = 60;
pub const DEFAULT_SLOT_DURATION: i64 = 60;

const MAX_MIN_ADVANCE_HOURS: i64 = 24 * 365;
const MAX_MAX_ADVANCE_DAYS: i64 = 3 * 365;

/// Global booking rules. `blocked_weekdays` uses 0 = Sunday … 6 = Saturday.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSettings {
    pub available_times: Vec<String>,
    pub blocked_dates: Vec<NaiveDate>,
    pub blocked_weekdays: Vec<u8>,
    pub min_advance_hours: i64,
    pub max_advance_days: i64,
    pub slot_duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            available_times: DEFAULT_AVAILABLE_TIMES.iter().map(|t| t.to_string()).collect(),
            blocked_dates: Vec::new(),
            blocked_weekdays: Vec::new(),
            min_advance_hours: DEFAULT_MIN_ADVANCE_HOURS,
            max_advance_days: DEFAULT_MAX_ADVANCE_DAYS,
            slot_duration: DEFAULT_SLOT_DURATION,
            updated_at: None,
        }
    }
}

impl BookingSettings {
    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_sunday() as u8;
        self.blocked_dates.contains(&date) || self.blocked_weekdays.contains(&weekday)
    }

    /// Canonical form: `HH:MM` times, sorted unique blocked days.
    pub fn normalize(&mut self) {
        for time in self.available_times.iter_mut() {
            if let Some(canonical) = timezone::normalize_time(time) {
                *time = canonical;
            }
        }
        self.blocked_dates.sort();
        self.blocked_dates.dedup();
        self.blocked_weekdays.sort();
        self.blocked_weekdays.dedup();
    }

    /// Rejects settings the scheduling policy cannot evaluate.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for time in &self.available_times {
            if timezone::minutes_since_midnight(time).is_none() {
                return Err(AppError::Validation(format!("availableTimes: '{}' is not a valid HH:MM time", time)));
            }
            if !seen.insert(time.as_str()) {
                return Err(AppError::Validation(format!("availableTimes: '{}' is listed twice", time)));
            }
        }
        if let Some(day) = self.blocked_weekdays.iter().find(|d| **d > 6) {
            return Err(AppError::Validation(format!("blockedWeekdays: {} is not a weekday index (0-6)", day)));
        }
        if !(0..=MAX_MIN_ADVANCE_HOURS).contains(&self.min_advance_hours) {
            return Err(AppError::Validation(format!("minAdvanceHours must be between 0 and {}", MAX_MIN_ADVANCE_HOURS)));
        }
        if !(0..=MAX_MAX_ADVANCE_DAYS).contains(&self.max_advance_days) {
            return Err(AppError::Validation(format!("maxAdvanceDays must be between 0 and {}", MAX_MAX_ADVANCE_DAYS)));
        }
        if !(1..=1440).contains(&self.slot_duration) {
            return Err(AppError::Validation("slotDuration must be between 1 and 1440 minutes".into()));
        }
        Ok(())
    }
}

/// Whether an administrator has ever stored settings.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsState {
    Configured(BookingSettings),
    Unconfigured,
}

impl SettingsState {
    pub fn from_record(record: Option<BookingSettings>) -> Self {
        match record {
            Some(settings) => SettingsState::Configured(settings),
            None => SettingsState::Unconfigured,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, SettingsState::Configured(_))
    }

    /// The rules in force: stored settings, or the documented defaults.
    pub fn effective(&self) -> BookingSettings {
        match self {
            SettingsState::Configured(settings) => settings.clone(),
            SettingsState::Unconfigured => BookingSettings::default(),
        }
    }
}
