pub mod calendar;
pub mod conflict;
pub mod fallback;
pub mod sample;
pub mod scheduling;
pub mod timezone;
