//! Static dataset served when the store cannot be read.

use chrono::{Duration, NaiveDate};

use crate::domain::models::{
    booking::{Booking, BookingStatus, Customer},
    settings::BookingSettings,
};
use crate::domain::services::timezone;

const SAMPLE_BOOKINGS: [(&str, (i32, u32, u32), &str, &str, &str, BookingStatus); 4] = [
    ("sample-1", (2025, 3, 3), "10:00", "11:00", "Model casting", BookingStatus::Confirmed),
    ("sample-2", (2025, 3, 3), "14:00", "15:00", "Studio rental", BookingStatus::Pending),
    ("sample-3", (2025, 3, 4), "11:00", "12:00", "Live commerce consultation", BookingStatus::Confirmed),
    ("sample-4", (2025, 3, 5), "13:00", "14:00", "Portfolio shoot", BookingStatus::Cancelled),
];

pub fn sample_bookings() -> Vec<Booking> {
    SAMPLE_BOOKINGS
        .iter()
        .filter_map(|(id, (y, m, d), time, end_time, service, status)| {
            let date = timezone::normalize_booking_date(NaiveDate::from_ymd_opt(*y, *m, *d)?);
            let created_at = date - Duration::days(7);
            Some(Booking {
                id: id.to_string(),
                date,
                time: time.to_string(),
                end_time: end_time.to_string(),
                service: service.to_string(),
                customer: Customer {
                    name: "Sample Customer".to_string(),
                    email: "sample@example.com".to_string(),
                    phone: "010-0000-0000".to_string(),
                    company: None,
                },
                status: *status,
                notes: None,
                created_at,
                updated_at: created_at,
            })
        })
        .collect()
}

pub fn sample_settings() -> BookingSettings {
    BookingSettings::default()
}
