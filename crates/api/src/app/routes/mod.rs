use axum::{Router, routing::get};

pub mod clients;
pub mod codes;
pub mod documents;
pub mod packing_lists;
pub mod system;

/// Router for every endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .nest("/clients", clients::router())
        .nest("/packing-lists", packing_lists::router().merge(documents::router()))
        .route("/codes/:code/validity", get(codes::validity))
}
