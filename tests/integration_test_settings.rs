mod common;

use axum::http::StatusCode;
use common::{booking_payload, slot_times, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_unconfigured_settings_report_defaults() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/booking-settings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "database");
    let data = &body["data"];
    assert_eq!(data["configured"], false);
    assert_eq!(
        data["availableTimes"],
        json!(["09:00", "10:00", "11:00", "13:00", "14:00", "15:00", "16:00", "17:00"])
    );
    assert_eq!(data["blockedDates"], json!([]));
    assert_eq!(data["blockedWeekdays"], json!([]));
    assert_eq!(data["minAdvanceHours"], 24);
    assert_eq!(data["maxAdvanceDays"], 60);
    assert_eq!(data["slotDuration"], 60);
}

#[tokio::test]
async fn test_replacing_settings_requires_admin() {
    let app = TestApp::new().await;

    let response = app
        .send("PUT", "/api/booking-settings", Some(json!({ "slotDuration": 30 })), false)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (_, body) = app.get("/api/booking-settings").await;
    assert_eq!(body["data"]["configured"], false);
}

#[tokio::test]
async fn test_replaced_settings_are_served_and_applied() {
    let app = TestApp::new().await;

    let (status, body) = app
        .admin_put(
            "/api/booking-settings",
            json!({
                "availableTimes": ["14:00", "9:30"],
                "blockedDates": ["2024-01-20", "2024-01-20"],
                "blockedWeekdays": [0, 6],
                "minAdvanceHours": 0,
                "maxAdvanceDays": 30,
                "slotDuration": 45
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["availableTimes"], json!(["14:00", "09:30"]));
    assert_eq!(body["data"]["blockedDates"], json!(["2024-01-20"]));

    let (_, body) = app.get("/api/booking-settings").await;
    assert_eq!(body["data"]["configured"], true);
    assert_eq!(body["data"]["slotDuration"], 45);
    assert!(body["data"]["updatedAt"].is_string());

    // no notice window: today's later slot is open, in configured order
    let (_, body) = app.get("/api/availability?date=2024-01-10").await;
    assert_eq!(slot_times(&body), vec!["14:00"]);
    let (_, body) = app.get("/api/availability?date=2024-01-11").await;
    assert_eq!(slot_times(&body), vec!["14:00", "09:30"]);
    assert_eq!(body["data"]["slots"][1]["endTime"], "10:15");

    let (status, body) = app.post("/api/bookings", booking_payload("2024-01-11", "09:30")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["endTime"], "10:15");
}

#[tokio::test]
async fn test_invalid_settings_are_rejected() {
    let app = TestApp::new().await;

    let cases = [
        json!({ "availableTimes": ["25:00"] }),
        json!({ "availableTimes": ["10:00", "10:00"] }),
        json!({ "blockedWeekdays": [7] }),
        json!({ "blockedDates": ["next friday"] }),
        json!({ "slotDuration": 0 }),
        json!({ "minAdvanceHours": -1 }),
        json!({ "maxAdvanceDays": -5 }),
        json!({ "slotDuration": "long" }),
    ];

    for payload in cases {
        let (status, body) = app.admin_put("/api/booking-settings", payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}", payload);
        assert_eq!(body["success"], false);
    }

    let (_, body) = app.get("/api/booking-settings").await;
    assert_eq!(body["data"]["configured"], false);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
