use chrono::{Days, Duration, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::domain::models::settings::BookingSettings;
use crate::domain::services::timezone::{self, Clock};

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub time: String,
    pub end_time: String,
}

/// Slots the rules allow on `date`, before existing bookings are considered.
/// Keeps the configured order of `available_times`.
pub fn eligible_slots(settings: &BookingSettings, date: NaiveDate, clock: &dyn Clock) -> Vec<Slot> {
    let today = clock.today();

    if settings.is_blocked(date) || clock.is_past(date) {
        return Vec::new();
    }
    if let Some(last_day) = today.checked_add_days(Days::new(settings.max_advance_days.max(0) as u64))
        && date > last_day
    {
        return Vec::new();
    }

    let Some(cutoff) = Duration::try_hours(settings.min_advance_hours.max(0))
        .and_then(|notice| clock.utc_now().checked_add_signed(notice))
    else {
        return Vec::new();
    };

    settings
        .available_times
        .iter()
        .filter_map(|time| {
            let Some(start) = timezone::slot_instant(date, time) else {
                warn!("Skipping malformed slot time '{}' in booking settings", time);
                return None;
            };
            if clock.is_slot_past(date, time) || start < cutoff {
                return None;
            }
            Some(Slot {
                time: time.clone(),
                end_time: timezone::add_minutes(time, settings.slot_duration)?,
            })
        })
        .collect()
}

/// End time implied by the configured slot length.
pub fn end_time_for(settings: &BookingSettings, time: &str) -> Option<String> {
    timezone::add_minutes(time, settings.slot_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::timezone::FixedClock;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn times(slots: &[Slot]) -> Vec<&str> {
        slots.iter().map(|s| s.time.as_str()).collect()
    }

    #[test]
    fn advance_notice_floor() {
        let clock = FixedClock::at_kst(d(2024, 1, 10), "10:00").unwrap();
        let slots = eligible_slots(&BookingSettings::default(), d(2024, 1, 11), &clock);

        let t = times(&slots);
        assert!(!t.contains(&"09:00"), "09:00 is less than 24h away");
        assert!(t.contains(&"10:00"), "exactly 24h away is still bookable");
        assert!(t.contains(&"11:00"));
        assert_eq!(t.len(), 7);
    }

    #[test]
    fn max_advance_ceiling() {
        let clock = FixedClock::at_kst(d(2024, 1, 1), "09:00").unwrap();
        let settings = BookingSettings::default();

        assert!(eligible_slots(&settings, d(2024, 3, 5), &clock).is_empty());
        assert_eq!(eligible_slots(&settings, d(2024, 2, 28), &clock).len(), 8);
        // day 60 is the last bookable day
        assert!(!eligible_slots(&settings, d(2024, 3, 1), &clock).is_empty());
        assert!(eligible_slots(&settings, d(2024, 3, 2), &clock).is_empty());
    }

    #[test]
    fn blocked_days_short_circuit() {
        let clock = FixedClock::at_kst(d(2024, 1, 1), "09:00").unwrap();
        let settings = BookingSettings {
            blocked_dates: vec![d(2024, 1, 17)],
            blocked_weekdays: vec![6], // Saturdays
            ..Default::default()
        };

        assert!(eligible_slots(&settings, d(2024, 1, 17), &clock).is_empty());
        assert!(eligible_slots(&settings, d(2024, 1, 20), &clock).is_empty());
        assert_eq!(eligible_slots(&settings, d(2024, 1, 18), &clock).len(), 8);
    }

    #[test]
    fn past_dates_have_no_slots() {
        let clock = FixedClock::at_kst(d(2024, 1, 10), "08:00").unwrap();
        let settings = BookingSettings { min_advance_hours: 0, ..Default::default() };
        assert!(eligible_slots(&settings, d(2024, 1, 9), &clock).is_empty());
    }

    #[test]
    fn same_day_without_notice_drops_started_slots() {
        let clock = FixedClock::at_kst(d(2024, 1, 10), "13:00").unwrap();
        let settings = BookingSettings { min_advance_hours: 0, ..Default::default() };
        let slots = eligible_slots(&settings, d(2024, 1, 10), &clock);
        assert_eq!(times(&slots), vec!["14:00", "15:00", "16:00", "17:00"]);
    }

    #[test]
    fn configured_order_and_end_times_are_kept() {
        let clock = FixedClock::at_kst(d(2024, 1, 1), "09:00").unwrap();
        let settings = BookingSettings {
            available_times: vec!["15:30".into(), "10:00".into()],
            slot_duration: 90,
            ..Default::default()
        };
        let slots = eligible_slots(&settings, d(2024, 1, 5), &clock);
        assert_eq!(
            slots,
            vec![
                Slot { time: "15:30".into(), end_time: "17:00".into() },
                Slot { time: "10:00".into(), end_time: "11:30".into() },
            ]
        );
    }
}
