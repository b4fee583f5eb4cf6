use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use lomartex_packing::{PackingListCode, PackingListDraft};

use crate::app::dto::{Items, PackingListQuery};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_packing_list).get(list_packing_lists))
        .route(
            "/:code",
            get(get_packing_list)
                .put(update_packing_list)
                .delete(delete_packing_list),
        )
}

pub async fn list_packing_lists(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<PackingListQuery>,
) -> axum::response::Response {
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let result = match search {
        Some(q) => services.packing_lists.search(q).await,
        None => services.packing_lists.list().await,
    };
    match result {
        Ok(items) => (StatusCode::OK, Json(Items { items })).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Assemble the draft under a freshly generated code and store it.
pub async fn create_packing_list(
    Extension(services): Extension<Arc<AppServices>>,
    Json(draft): Json<PackingListDraft>,
) -> axum::response::Response {
    let list = match draft.into_packing_list(PackingListCode::generate()) {
        Ok(list) => list,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.packing_lists.create(list).await {
        Ok(list) => {
            tracing::info!(code = %list.code, boxes = list.boxes.len(), "packing list created");
            (StatusCode::CREATED, Json(list)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_packing_list(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    match services.packing_lists.get(&code).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_packing_list(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
    Json(draft): Json<PackingListDraft>,
) -> axum::response::Response {
    let code = match PackingListCode::parse(&code) {
        Ok(code) => code,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let list = match draft.into_packing_list(code.clone()) {
        Ok(list) => list,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.packing_lists.update(code.as_str(), list).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_packing_list(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    match services.packing_lists.delete(&code).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
