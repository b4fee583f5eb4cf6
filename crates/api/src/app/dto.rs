use serde::{Deserialize, Serialize};

use lomartex_infra::store::DEFAULT_CLIENT_SEARCH_LIMIT;

// -------------------------
// Request DTOs
// -------------------------

/// `GET /clients?q=&limit=`
#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

impl ClientQuery {
    /// Non-blank search text, if any.
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_CLIENT_SEARCH_LIMIT)
    }
}

/// `GET /packing-lists?q=`
#[derive(Debug, Default, Deserialize)]
pub struct PackingListQuery {
    pub q: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct CodeValidity {
    pub code: String,
    pub valid: bool,
}
