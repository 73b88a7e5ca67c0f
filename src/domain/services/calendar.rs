use crate::domain::models::booking::Booking;
use crate::domain::services::timezone;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for a specific booking
pub fn generate_ics(booking: &Booking) -> Option<String> {
    let date = booking.kst_date();
    let starts = timezone::slot_instant(date, &booking.time)?;
    let mut ends = timezone::slot_instant(date, &booking.end_time)?;
    if ends <= starts {
        // slot runs past midnight
        ends += chrono::Duration::days(1);
    }

    let mut description = format!(
        "Customer: {} <{}>, {}",
        booking.customer.name, booking.customer.email, booking.customer.phone
    );
    if let Some(ref company) = booking.customer.company {
        description.push_str(&format!("\nCompany: {}", company));
    }
    if let Some(ref notes) = booking.notes {
        description.push_str(&format!("\nNotes: {}", notes));
    }

    let ical_event = IcalEvent::new()
        .summary(&format!("{} ({})", booking.service, booking.status))
        .description(&description)
        .starts(starts)
        .ends(ends)
        .uid(&booking.id)
        .done();

    let mut calendar = Calendar::new();
    calendar.push(ical_event);
    Some(calendar.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::{Customer, NewBookingParams};
    use chrono::NaiveDate;

    #[test]
    fn ics_carries_the_kst_slot_in_utc() {
        let booking = Booking::new(
            NewBookingParams {
                date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
                time: "10:00".into(),
                end_time: "11:00".into(),
                service: "Model casting".into(),
                customer: Customer {
                    name: "Lee".into(),
                    email: "lee@example.com".into(),
                    phone: "010".into(),
                    company: Some("Acme".into()),
                },
                notes: None,
            },
            chrono::Utc::now(),
        );

        let ics = generate_ics(&booking).unwrap();
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("Model casting (pending)"));
        assert!(ics.contains("20240111T010000Z"), "10:00 KST is 01:00 UTC: {}", ics);
        assert!(ics.contains(&booking.id));
    }
}
