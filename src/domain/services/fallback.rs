use std::future::Future;
use std::sync::Arc;
use serde::Serialize;
use tracing::warn;

use crate::domain::models::{
    booking::{sort_by_schedule, Booking, BookingFilter},
    settings::SettingsState,
};
use crate::domain::ports::{BookingRepository, SettingsRepository};
use crate::domain::services::sample;
use crate::error::AppError;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Database,
    Sample,
}

impl DataSource {
    /// A result built from several reads is only as real as its weakest part.
    pub fn and(self, other: DataSource) -> DataSource {
        if self == DataSource::Sample || other == DataSource::Sample {
            DataSource::Sample
        } else {
            DataSource::Database
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced { data: f(self.data), source: self.source }
    }
}

/// Read-only view over the stores that degrades to the static sample
/// dataset instead of failing. Write paths must use the repositories
/// directly.
#[derive(Clone)]
pub struct FallbackReader {
    bookings: Arc<dyn BookingRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl FallbackReader {
    pub fn new(bookings: Arc<dyn BookingRepository>, settings: Arc<dyn SettingsRepository>) -> Self {
        Self { bookings, settings }
    }

    pub async fn find_bookings(&self, filter: &BookingFilter) -> Sourced<Vec<Booking>> {
        or_sample("bookings", self.bookings.find(filter), || {
            let mut rows: Vec<Booking> = sample::sample_bookings()
                .into_iter()
                .filter(|b| filter.matches(b))
                .collect();
            sort_by_schedule(&mut rows);
            rows
        })
        .await
    }

    pub async fn find_booking(&self, id: &str) -> Sourced<Option<Booking>> {
        or_sample("booking", self.bookings.find_one(id), || {
            sample::sample_bookings().into_iter().find(|b| b.id == id)
        })
        .await
    }

    pub async fn load_settings(&self) -> Sourced<SettingsState> {
        or_sample(
            "booking settings",
            async { self.settings.load().await.map(SettingsState::from_record) },
            || SettingsState::Configured(sample::sample_settings()),
        )
        .await
    }
}

async fn or_sample<T, F>(what: &str, read: F, sample: impl FnOnce() -> T) -> Sourced<T>
where
    F: Future<Output = Result<T, AppError>>,
{
    match read.await {
        Ok(data) => Sourced { data, source: DataSource::Database },
        Err(e) => {
            warn!("Reading {} failed, serving sample data instead: {}", what, e);
            Sourced { data: sample(), source: DataSource::Sample }
        }
    }
}
