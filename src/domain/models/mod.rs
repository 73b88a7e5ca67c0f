pub mod booking;
pub mod settings;
