use std::env;
use crate::error::StartupError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://agency-booking.db?mode=rwc";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub admin_token: Option<String>, // Bearer token for privileged routes
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, StartupError> {
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port
            .parse()
            .map_err(|_| StartupError::Config(format!("PORT must be a number, got '{}'", port)))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            port,
            admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
        })
    }
}
