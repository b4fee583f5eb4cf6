use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};

use lomartex_packing::PackingList;
use lomartex_printing::{Layout, UnknownLayout, print_document, render};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/:code/documents/:layout", get(get_document))
        .route("/:code/print/:layout", post(print))
}

async fn load(
    services: &AppServices,
    code: &str,
    layout: &str,
) -> Result<(PackingList, Layout), axum::response::Response> {
    let layout: Layout = layout
        .parse()
        .map_err(|e: UnknownLayout| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_layout", e.to_string())
        })?;
    let list = services
        .packing_lists
        .get(code)
        .await
        .map_err(errors::store_error_to_response)?;
    Ok((list, layout))
}

/// Rendered HTML for previewing or printing client-side.
pub async fn get_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path((code, layout)): Path<(String, String)>,
) -> axum::response::Response {
    let (list, layout) = match load(&services, &code, &layout).await {
        Ok(loaded) => loaded,
        Err(resp) => return resp,
    };
    match render(layout, Some(&list)) {
        Ok(doc) => Html(doc.html).into_response(),
        Err(e) => errors::print_error_to_response(e),
    }
}

/// Print through the configured spool.
pub async fn print(
    Extension(services): Extension<Arc<AppServices>>,
    Path((code, layout)): Path<(String, String)>,
) -> axum::response::Response {
    let (list, layout) = match load(&services, &code, &layout).await {
        Ok(loaded) => loaded,
        Err(resp) => return resp,
    };

    let surfaces = Arc::clone(&services.surfaces);
    let job = tokio::task::spawn_blocking(move || print_document(layout, Some(&list), &*surfaces)).await;
    match job {
        Ok(Ok(receipt)) => (StatusCode::OK, Json(receipt)).into_response(),
        Ok(Err(e)) => errors::print_error_to_response(e),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "print_job_failed",
            format!("print job did not complete: {e}"),
        ),
    }
}
