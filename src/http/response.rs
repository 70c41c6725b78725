//! Error response formatting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Build the JSON error body every non-proxied outcome uses:
/// `{"status": <code>, "message": <text>}`.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    let body = Json(serde_json::json!({
        "status": status.as_u16(),
        "message": message,
    }));
    (status, body).into_response()
}
