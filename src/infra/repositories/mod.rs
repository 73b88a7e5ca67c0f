pub mod sqlite_booking_repo;
pub mod sqlite_settings_repo;

pub mod postgres_booking_repo;
pub mod postgres_settings_repo;

mod settings_row;
