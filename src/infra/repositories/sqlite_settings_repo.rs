use crate::domain::{models::settings::BookingSettings, ports::SettingsRepository};
use crate::error::AppError;
use crate::infra::repositories::settings_row::{EncodedLists, SettingsRow};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepo {
    async fn load(&self) -> Result<Option<BookingSettings>, AppError> {
        let row = sqlx::query_as::<_, SettingsRow>("SELECT * FROM booking_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Store)?;

        row.map(BookingSettings::try_from).transpose()
    }

    async fn save(&self, settings: &BookingSettings) -> Result<BookingSettings, AppError> {
        let lists = EncodedLists::of(settings)?;
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"INSERT INTO booking_settings (id, available_times, blocked_dates, blocked_weekdays, min_advance_hours, max_advance_days, slot_duration, updated_at)
               VALUES (1, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
               available_times=excluded.available_times,
               blocked_dates=excluded.blocked_dates,
               blocked_weekdays=excluded.blocked_weekdays,
               min_advance_hours=excluded.min_advance_hours,
               max_advance_days=excluded.max_advance_days,
               slot_duration=excluded.slot_duration,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(lists.available_times)
            .bind(lists.blocked_dates)
            .bind(lists.blocked_weekdays)
            .bind(settings.min_advance_hours)
            .bind(settings.max_advance_days)
            .bind(settings.slot_duration)
            .bind(settings.updated_at.unwrap_or_else(Utc::now))
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Store)?;

        BookingSettings::try_from(row)
    }
}
