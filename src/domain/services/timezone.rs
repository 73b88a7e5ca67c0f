//! KST (UTC+9, no daylight saving) date handling.
//!
//! Every business-hour comparison goes through this module so that results
//! never depend on the timezone of the machine evaluating them.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike, Utc,
};
use crate::error::AppError;

pub const KST_OFFSET_SECS: i32 = 9 * 3600;
const MINUTES_PER_DAY: u32 = 24 * 60;

pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or(Utc.fix())
}

/// Source of the current instant. Everything KST-relative derives from it.
pub trait Clock: Send + Sync {
    fn utc_now(&self) -> DateTime<Utc>;

    /// Current instant as KST wall-clock time.
    fn now(&self) -> DateTime<FixedOffset> {
        self.utc_now().with_timezone(&kst())
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn is_today(&self, instant: &DateTime<Utc>) -> bool {
        kst_date_of(instant) == self.today()
    }

    /// True for any calendar day before today (KST).
    fn is_past(&self, date: NaiveDate) -> bool {
        date < self.today()
    }

    /// Minute-granular. A slot starting exactly now counts as past, and so
    /// does an unparseable time.
    fn is_slot_past(&self, date: NaiveDate, time: &str) -> bool {
        let today = self.today();
        if date != today {
            return date < today;
        }
        let Some(slot_minutes) = minutes_since_midnight(time) else {
            return true;
        };
        let now = self.now();
        slot_minutes <= now.hour() * 60 + now.minute()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        Self(instant.with_timezone(&Utc))
    }

    /// Pins the clock to a KST wall-clock time.
    pub fn at_kst(date: NaiveDate, time: &str) -> Option<Self> {
        slot_instant(date, time).map(Self)
    }
}

impl Clock for FixedClock {
    fn utc_now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn kst_local_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(local - Duration::seconds(KST_OFFSET_SECS as i64)))
}

pub fn kst_date_of<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.with_timezone(&kst()).date_naive()
}

/// "YYYY-MM-DD" of the KST calendar day containing `instant`.
pub fn to_kst_date_string<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    kst_date_of(instant).format("%Y-%m-%d").to_string()
}

/// Reads a calendar date. A bare `YYYY-MM-DD` is taken as-is; a full
/// RFC 3339 timestamp is first moved to KST.
pub fn parse_date_string(s: &str) -> Result<NaiveDate, AppError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| kst_date_of(&dt))
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

/// `HH:MM` → minutes since midnight.
pub fn minutes_since_midnight(time: &str) -> Option<u32> {
    let (h, m) = time.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

pub fn format_minutes(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Canonical `HH:MM` form ("9:00" → "09:00").
pub fn normalize_time(time: &str) -> Option<String> {
    minutes_since_midnight(time).map(format_minutes)
}

/// `time + minutes`, wrapping past midnight.
pub fn add_minutes(time: &str, minutes: i64) -> Option<String> {
    let start = minutes_since_midnight(time)? as i64;
    let total = (start + minutes).rem_euclid(MINUTES_PER_DAY as i64);
    Some(format_minutes(total as u32))
}

/// Absolute instant of a KST wall-clock slot.
pub fn slot_instant(date: NaiveDate, time: &str) -> Option<DateTime<Utc>> {
    let minutes = minutes_since_midnight(time)?;
    let local = date.and_time(NaiveTime::default()) + Duration::minutes(minutes as i64);
    Some(kst_local_to_utc(local))
}

/// [00:00, 23:59:59.999] of a KST calendar day, in UTC.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = kst_local_to_utc(date.and_time(NaiveTime::default()));
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

/// Stored form of a booking date: KST noon, far from either day boundary.
pub fn normalize_booking_date(date: NaiveDate) -> DateTime<Utc> {
    day_bounds(date).0 + Duration::hours(12)
}
