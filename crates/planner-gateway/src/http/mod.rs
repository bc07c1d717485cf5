pub mod health;
pub mod schedule;
pub mod ui;
pub mod users;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Error half of every JSON handler: a status code and `{"error": ...}`.
pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}
