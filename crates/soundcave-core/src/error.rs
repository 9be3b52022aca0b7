use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

/// Render a JSON error body `{"kind", "message"}` with the given status.
pub fn error_response(status: StatusCode, kind: &str, message: String) -> Response {
    let body = serde_json::json!({
        "kind": kind,
        "message": message,
    });
    (status, axum::Json(body)).into_response()
}

/// Render an opaque 500 for an infrastructure failure.
///
/// The full anyhow chain is logged together with a fresh correlation id; the
/// client only sees the id, never the underlying error text.
pub fn internal_error_response(error: &anyhow::Error) -> Response {
    let correlation_id = Uuid::new_v4();
    tracing::error!(
        error = %format_args!("{error:#}"),
        %correlation_id,
        kind = "INTERNAL",
        "internal error"
    );
    let body = serde_json::json!({
        "kind": "INTERNAL",
        "message": "internal server error",
        "correlation_id": correlation_id.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}
