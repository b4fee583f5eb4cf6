use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use lomartex_core::DomainError;
use lomartex_infra::StoreError;
use lomartex_printing::PrintError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        StoreError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "record store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    store_error_to_response(err.into())
}

pub fn print_error_to_response(err: PrintError) -> axum::response::Response {
    match &err {
        PrintError::Validation(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        PrintError::Encoding(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "encoding_error", err.to_string())
        }
        PrintError::RenderSurface { .. } => {
            tracing::warn!(error = %err, "print surface unavailable");
            let message = match err.guidance() {
                Some(hint) => format!("{err}. {hint}"),
                None => err.to_string(),
            };
            json_error(StatusCode::SERVICE_UNAVAILABLE, "render_surface_error", message)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
