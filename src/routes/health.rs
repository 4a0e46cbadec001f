use axum::{Json, http::HeaderMap};
use serde::Serialize;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
}

pub async fn health_check(headers: HeaderMap) -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok".to_string(),
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::from_headers(&headers)),
    ))
}
