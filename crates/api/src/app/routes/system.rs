use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::app::errors;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "Not found.")
}
