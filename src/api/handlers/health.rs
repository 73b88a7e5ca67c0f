use axum::{response::IntoResponse, Json};

use crate::api::dtos::responses::HealthResponse;

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}
