use axum::{
    extract::Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "message": "Server is running" }))
}

/// Unmatched `/api/*` paths answer 501, anything else 404.
pub async fn fallback_handler(uri: Uri) -> Response {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        warn!("No API route for {}", path);
        return (
            StatusCode::NOT_IMPLEMENTED,
            Json(json!({
                "error": "Not Implemented",
                "message": format!("The endpoint {} is not implemented", path),
                "path": path,
            })),
        )
            .into_response();
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "NotFound", "message": "Not found", "path": path })),
    )
        .into_response()
}
