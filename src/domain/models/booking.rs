use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::domain::services::timezone;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// `pending -> confirmed`, `pending | confirmed -> cancelled`.
    /// Staying in the same status is always allowed.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Pending)
                | (Confirmed, Confirmed)
                | (Cancelled, Cancelled)
                | (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    pub fn is_active(&self) -> bool {
        *self != BookingStatus::Cancelled
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("Unknown booking status '{}'", other)),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Customer {
    #[sqlx(rename = "customer_name")]
    pub name: String,
    #[sqlx(rename = "customer_email")]
    pub email: String,
    #[sqlx(rename = "customer_phone")]
    pub phone: String,
    #[sqlx(rename = "customer_company")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    /// KST calendar date, stored as the instant of KST noon on that day.
    #[sqlx(rename = "booking_date")]
    pub date: DateTime<Utc>,
    pub time: String,
    pub end_time: String,
    pub service: String,
    #[sqlx(flatten)]
    pub customer: Customer,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub date: NaiveDate,
    pub time: String,
    pub end_time: String,
    pub service: String,
    pub customer: Customer,
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: timezone::normalize_booking_date(params.date),
            time: params.time,
            end_time: params.end_time,
            service: params.service,
            customer: params.customer,
            status: BookingStatus::Pending,
            notes: params.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// The KST calendar date this booking occupies.
    pub fn kst_date(&self) -> NaiveDate {
        timezone::kst_date_of(&self.date)
    }
}

/// Public, anonymised view of an occupied slot.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OccupiedSlot {
    pub time: String,
    pub end_time: String,
    pub service: String,
}

impl From<&Booking> for OccupiedSlot {
    fn from(b: &Booking) -> Self {
        Self {
            time: b.time.clone(),
            end_time: b.end_time.clone(),
            service: b.service.clone(),
        }
    }
}

/// Equality and range criteria understood by every booking store.
/// `from`/`to` are inclusive KST calendar dates.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub exclude_cancelled: bool,
    pub time: Option<String>,
    pub exclude_id: Option<String>,
}

impl BookingFilter {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            from: Some(date),
            to: Some(date),
            ..Default::default()
        }
    }

    pub fn active_on(date: NaiveDate) -> Self {
        Self {
            exclude_cancelled: true,
            ..Self::on(date)
        }
    }

    pub fn active_between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            exclude_cancelled: true,
            ..Default::default()
        }
    }

    /// UTC instants bounding the date range, if any.
    pub fn instant_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (
            self.from.map(|d| timezone::day_bounds(d).0),
            self.to.map(|d| timezone::day_bounds(d).1),
        )
    }

    /// In-memory evaluation, used where no SQL store is involved.
    pub fn matches(&self, booking: &Booking) -> bool {
        let (start, end) = self.instant_bounds();
        if start.is_some_and(|s| booking.date < s) || end.is_some_and(|e| booking.date > e) {
            return false;
        }
        if let Some(status) = self.status
            && booking.status != status
        {
            return false;
        }
        if self.exclude_cancelled && !booking.status.is_active() {
            return false;
        }
        if let Some(ref time) = self.time
            && &booking.time != time
        {
            return false;
        }
        if let Some(ref id) = self.exclude_id
            && &booking.id == id
        {
            return false;
        }
        true
    }
}

/// Orders bookings by date, then start time.
pub fn sort_by_schedule(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
}
