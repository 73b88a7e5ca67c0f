use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::models::booking::{Booking, BookingFilter, Customer, NewBookingParams};
use crate::domain::models::settings::BookingSettings;
use crate::domain::ports::{BookingRepository, Clock, SettingsRepository};
use crate::domain::services::fallback::{FallbackReader, Sourced};
use crate::domain::services::scheduling::{eligible_slots, end_time_for, Slot};
use crate::domain::services::timezone;
use crate::error::{AppError, SLOT_TAKEN};

/// Unvalidated booking submission. Empty strings count as missing.
#[derive(Debug, Default, Clone)]
pub struct BookingDraft {
    pub date: Option<String>,
    pub time: Option<String>,
    pub end_time: Option<String>,
    pub service: Option<String>,
    pub customer: Option<CustomerDraft>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct CustomerDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// A submission with every required field present and well-formed.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: String,
    pub end_time: Option<String>,
    pub service: String,
    pub customer: Customer,
    pub notes: Option<String>,
}

/// Whether the offered-slot rules apply to a creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyCheck {
    /// Public submissions: `time` must be an eligible slot on `date`.
    Enforce,
    /// Administrator entries: any well-formed time, conflicts still apply.
    Override,
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl BookingDraft {
    pub fn validate(self) -> Result<BookingRequest, AppError> {
        let date = present(self.date);
        let time = present(self.time);
        let service = present(self.service);
        let customer = self.customer.map(|c| {
            (present(c.name), present(c.email), present(c.phone), present(c.company))
        });

        let mut missing = Vec::new();
        if date.is_none() { missing.push("date"); }
        if time.is_none() { missing.push("time"); }
        if service.is_none() { missing.push("service"); }
        match &customer {
            None => missing.push("customer"),
            Some((name, email, phone, _)) => {
                if name.is_none() { missing.push("customer.name"); }
                if email.is_none() { missing.push("customer.email"); }
                if phone.is_none() { missing.push("customer.phone"); }
            }
        }

        let (Some(date), Some(time), Some(service), Some((Some(name), Some(email), Some(phone), company))) =
            (date, time, service, customer)
        else {
            return Err(AppError::Validation(format!("Missing required fields: {}", missing.join(", "))));
        };

        let date = timezone::parse_date_string(&date)?;
        let time = timezone::normalize_time(&time)
            .ok_or_else(|| AppError::Validation(format!("Invalid time '{}', expected HH:MM", time)))?;
        let end_time = match present(self.end_time) {
            Some(end) => Some(
                timezone::normalize_time(&end)
                    .ok_or_else(|| AppError::Validation(format!("Invalid endTime '{}', expected HH:MM", end)))?,
            ),
            None => None,
        };
        if !email.contains('@') {
            return Err(AppError::Validation("customer.email is not a valid email address".into()));
        }

        Ok(BookingRequest {
            date,
            time,
            end_time,
            service,
            customer: Customer { name, email, phone, company },
            notes: present(self.notes),
        })
    }
}

/// Reconciles the slots the rules offer with the slots already taken, and
/// gates every write that could claim a slot.
#[derive(Clone)]
pub struct ConflictResolver {
    bookings: Arc<dyn BookingRepository>,
    settings: Arc<dyn SettingsRepository>,
    reader: FallbackReader,
    clock: Arc<dyn Clock>,
}

impl ConflictResolver {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        settings: Arc<dyn SettingsRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let reader = FallbackReader::new(bookings.clone(), settings.clone());
        Self { bookings, settings, reader, clock }
    }

    /// Free slots on `date`: the policy's slots minus non-cancelled bookings.
    pub async fn available_slots(&self, date: NaiveDate) -> Sourced<Vec<Slot>> {
        let settings = self.reader.load_settings().await;
        let booked = self.reader.find_bookings(&BookingFilter::active_on(date)).await;

        let taken: HashSet<&str> = booked.data.iter().map(|b| b.time.as_str()).collect();
        let slots = eligible_slots(&settings.data.effective(), date, self.clock.as_ref())
            .into_iter()
            .filter(|slot| !taken.contains(slot.time.as_str()))
            .collect();

        Sourced { data: slots, source: settings.source.and(booked.source) }
    }

    /// Dates in `[from, to]` with at least one free slot.
    pub async fn available_dates(&self, from: NaiveDate, to: NaiveDate) -> Sourced<Vec<NaiveDate>> {
        let settings = self.reader.load_settings().await;
        let booked = self.reader.find_bookings(&BookingFilter::active_between(from, to)).await;
        let rules = settings.data.effective();

        let mut taken: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();
        for booking in &booked.data {
            taken.entry(booking.kst_date()).or_default().insert(booking.time.as_str());
        }

        let dates = from
            .iter_days()
            .take_while(|d| *d <= to)
            .filter(|d| {
                let day_taken = taken.get(d);
                eligible_slots(&rules, *d, self.clock.as_ref())
                    .iter()
                    .any(|slot| !day_taken.is_some_and(|t| t.contains(slot.time.as_str())))
            })
            .collect();

        Sourced { data: dates, source: settings.source.and(booked.source) }
    }

    /// Settings in force for a write. Store failures propagate.
    pub async fn current_settings(&self) -> Result<BookingSettings, AppError> {
        let record = self.settings.load().await?;
        Ok(record.unwrap_or_default())
    }

    /// Fails with a conflict if another non-cancelled booking holds
    /// `time` on `date`.
    pub async fn ensure_slot_free(&self, date: NaiveDate, time: &str, exclude_id: Option<&str>) -> Result<(), AppError> {
        let filter = BookingFilter {
            time: Some(time.to_string()),
            exclude_id: exclude_id.map(str::to_string),
            ..BookingFilter::active_on(date)
        };
        let holders = self.bookings.find(&filter).await?;
        if let Some(holder) = holders.first() {
            warn!("Slot {} {} already held by booking {}", date, time, holder.id);
            return Err(AppError::Conflict(SLOT_TAKEN.to_string()));
        }
        Ok(())
    }

    /// Validates and stores a new `pending` booking. The store's unique
    /// (date, time) index settles races between concurrent submissions.
    pub async fn create(&self, draft: BookingDraft, policy: PolicyCheck) -> Result<Booking, AppError> {
        let request = draft.validate()?;
        let settings = self.current_settings().await?;

        if policy == PolicyCheck::Enforce {
            let offered = eligible_slots(&settings, request.date, self.clock.as_ref());
            if !offered.iter().any(|slot| slot.time == request.time) {
                warn!("Rejected booking for {} {}: not an offered slot", request.date, request.time);
                return Err(AppError::Validation(format!(
                    "{} on {} is not an available booking time",
                    request.time, request.date
                )));
            }
        }

        let end_time = match request.end_time {
            Some(end) => end,
            None => end_time_for(&settings, &request.time)
                .ok_or_else(|| AppError::Internal(format!("Cannot derive end time for {}", request.time)))?,
        };

        self.ensure_slot_free(request.date, &request.time, None).await?;

        let booking = Booking::new(
            NewBookingParams {
                date: request.date,
                time: request.time,
                end_time,
                service: request.service,
                customer: request.customer,
                notes: request.notes,
            },
            self.clock.utc_now(),
        );

        let created = self.bookings.create(&booking).await?;
        info!("Booking created: {} on {} at {}", created.id, request.date, created.time);
        Ok(created)
    }
}
