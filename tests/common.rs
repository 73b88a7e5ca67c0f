#![allow(dead_code)]

use agency_booking::{
    api::router::create_router,
    config::Config,
    domain::{
        models::{booking::{Booking, BookingFilter}, settings::BookingSettings},
        ports::{BookingRepository, Clock, SettingsRepository},
        services::timezone::FixedClock,
    },
    error::AppError,
    infra::{
        factory::run_sqlite_migrations,
        repositories::{sqlite_booking_repo::SqliteBookingRepo, sqlite_settings_repo::SqliteSettingsRepo},
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// 2024-01-10 (Wednesday) 10:00 KST.
pub fn default_clock() -> FixedClock {
    FixedClock::at_kst(date(2024, 1, 10), "10:00").unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        port: 0,
        admin_token: Some(ADMIN_TOKEN.to_string()),
        log_dir: "./logs".to_string(),
    }
}

/// Simulates a store outage: every call fails.
pub struct FailingStore;

fn outage() -> AppError {
    AppError::Store(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl BookingRepository for FailingStore {
    async fn find(&self, _filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        Err(outage())
    }
    async fn find_one(&self, _id: &str) -> Result<Option<Booking>, AppError> {
        Err(outage())
    }
    async fn create(&self, _booking: &Booking) -> Result<Booking, AppError> {
        Err(outage())
    }
    async fn update(&self, _booking: &Booking) -> Result<Booking, AppError> {
        Err(outage())
    }
    async fn delete(&self, _id: &str) -> Result<(), AppError> {
        Err(outage())
    }
}

#[async_trait]
impl SettingsRepository for FailingStore {
    async fn load(&self) -> Result<Option<BookingSettings>, AppError> {
        Err(outage())
    }
    async fn save(&self, _settings: &BookingSettings) -> Result<BookingSettings, AppError> {
        Err(outage())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub pool: Option<Pool<Sqlite>>,
    db_filename: Option<String>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_clock(default_clock()).await
    }

    pub async fn with_clock(clock: impl Clock + 'static) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await.expect("Failed to migrate test db");

        let state = Arc::new(AppState {
            config: test_config(db_url),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            settings_repo: Arc::new(SqliteSettingsRepo::new(pool.clone())),
            clock: Arc::new(clock),
        });

        Self {
            router: create_router(state.clone()),
            state,
            pool: Some(pool),
            db_filename: Some(db_filename),
        }
    }

    /// Bookings on the temp database, settings store unreachable.
    pub async fn with_failing_settings() -> Self {
        let mut app = Self::new().await;
        let state = Arc::new(AppState {
            settings_repo: Arc::new(FailingStore),
            ..(*app.state).clone()
        });
        app.router = create_router(state.clone());
        app.state = state;
        app
    }

    /// App whose stores are unreachable.
    pub fn with_failing_store() -> Self {
        let store = Arc::new(FailingStore);
        let state = Arc::new(AppState {
            config: test_config("sqlite://unreachable.db".to_string()),
            booking_repo: store.clone(),
            settings_repo: store,
            clock: Arc::new(default_clock()),
        });

        Self {
            router: create_router(state.clone()),
            state,
            pool: None,
            db_filename: None,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>, admin: bool) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if admin {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        json_of(self.send("GET", uri, None, false).await).await
    }

    pub async fn admin_get(&self, uri: &str) -> (StatusCode, Value) {
        json_of(self.send("GET", uri, None, true).await).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        json_of(self.send("POST", uri, Some(body), false).await).await
    }

    pub async fn admin_post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        json_of(self.send("POST", uri, Some(body), true).await).await
    }

    pub async fn admin_put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        json_of(self.send("PUT", uri, Some(body), true).await).await
    }

    pub async fn admin_delete(&self, uri: &str) -> (StatusCode, Value) {
        json_of(self.send("DELETE", uri, None, true).await).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(ref name) = self.db_filename {
            let _ = std::fs::remove_file(name);
            let _ = std::fs::remove_file(format!("{}-wal", name));
            let _ = std::fs::remove_file(format!("{}-shm", name));
        }
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn json_of(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = body_text(response).await;
    let json = if text.is_empty() { Value::Null } else { serde_json::from_str(&text).unwrap() };
    (status, json)
}

/// A complete public booking submission.
pub fn booking_payload(date: &str, time: &str) -> Value {
    serde_json::json!({
        "date": date,
        "time": time,
        "service": "Model casting",
        "customer": {
            "name": "Kim Minji",
            "email": "minji@example.com",
            "phone": "010-1234-5678",
            "company": "Studio K"
        },
        "notes": "First visit"
    })
}

pub fn slot_times(body: &Value) -> Vec<String> {
    body["data"]["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["time"].as_str().unwrap().to_string())
        .collect()
}
