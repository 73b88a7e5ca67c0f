mod common;

use agency_booking::{
    domain::models::booking::{Booking, BookingStatus, Customer, NewBookingParams},
    error::AppError,
};
use chrono::Utc;
use common::{date, TestApp};

fn booking_at(day: u32, time: &str) -> Booking {
    Booking::new(
        NewBookingParams {
            date: date(2024, 1, day),
            time: time.to_string(),
            end_time: "00:00".to_string(),
            service: "Studio rental".to_string(),
            customer: Customer {
                name: "Park".to_string(),
                email: "park@example.com".to_string(),
                phone: "010-5555-0000".to_string(),
                company: None,
            },
            notes: None,
        },
        Utc::now(),
    )
}

// These go straight to the repository, past the resolver's lookup, so the
// storage index is the only thing standing between two writers.

#[tokio::test]
async fn test_store_rejects_second_insert_into_active_slot() {
    let app = TestApp::new().await;
    let repo = &app.state.booking_repo;

    repo.create(&booking_at(12, "10:00")).await.unwrap();
    let second = repo.create(&booking_at(12, "10:00")).await;

    assert!(matches!(second, Err(AppError::Conflict(_))), "got {:?}", second);

    // other day or other time is fine
    repo.create(&booking_at(13, "10:00")).await.unwrap();
    repo.create(&booking_at(12, "11:00")).await.unwrap();
}

#[tokio::test]
async fn test_store_accepts_insert_once_holder_is_cancelled() {
    let app = TestApp::new().await;
    let repo = &app.state.booking_repo;

    let mut holder = repo.create(&booking_at(12, "14:00")).await.unwrap();
    holder.status = BookingStatus::Cancelled;
    repo.update(&holder).await.unwrap();

    let replacement = repo.create(&booking_at(12, "14:00")).await.unwrap();
    assert_eq!(replacement.status, BookingStatus::Pending);

    // the cancelled row cannot be revived onto the taken slot
    holder.status = BookingStatus::Pending;
    let revived = repo.update(&holder).await;
    assert!(matches!(revived, Err(AppError::Conflict(_))), "got {:?}", revived);
}

#[tokio::test]
async fn test_store_rejects_update_onto_occupied_slot() {
    let app = TestApp::new().await;
    let repo = &app.state.booking_repo;

    repo.create(&booking_at(12, "15:00")).await.unwrap();
    let mut mover = repo.create(&booking_at(12, "16:00")).await.unwrap();

    mover.time = "15:00".to_string();
    let moved = repo.update(&mover).await;
    assert!(matches!(moved, Err(AppError::Conflict(_))), "got {:?}", moved);

    let unchanged = repo.find_one(&mover.id).await.unwrap().unwrap();
    assert_eq!(unchanged.time, "16:00");
}
