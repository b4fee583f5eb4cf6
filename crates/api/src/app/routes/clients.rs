use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use lomartex_clients::Client;
use lomartex_core::ClientId;

use crate::app::dto::{ClientQuery, Items};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_client).get(list_clients))
        .route("/:id", get(get_client).put(update_client).delete(delete_client))
}

fn parse_id(id: &str) -> Result<ClientId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid client id"))
}

pub async fn list_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ClientQuery>,
) -> axum::response::Response {
    let result = match query.search() {
        Some(q) => services.clients.search(q, query.limit()).await,
        None => services.clients.list().await,
    };
    match result {
        Ok(items) => (StatusCode::OK, Json(Items { items })).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_client(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<Client>,
) -> axum::response::Response {
    match services.clients.create(body).await {
        Ok(client) => {
            tracing::info!(client_id = %client.id, "client created");
            (StatusCode::CREATED, Json(client)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_client(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.clients.get(id).await {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_client(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(mut body): Json<Client>,
) -> axum::response::Response {
    body.id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.clients.update(body).await {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_client(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.clients.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
