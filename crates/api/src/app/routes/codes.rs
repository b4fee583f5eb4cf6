use axum::{Json, extract::Path};

use lomartex_packing::PackingListCode;

use crate::app::dto::CodeValidity;

pub async fn validity(Path(code): Path<String>) -> Json<CodeValidity> {
    let valid = PackingListCode::is_valid(&code);
    Json(CodeValidity { code, valid })
}
