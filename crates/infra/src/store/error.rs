use thiserror::Error;

use lomartex_core::DomainError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvariantViolation(msg) => {
                StoreError::Validation(msg)
            }
            DomainError::InvalidId(msg) => StoreError::InvalidId(msg),
            DomainError::NotFound => StoreError::NotFound,
            DomainError::Conflict(msg) => StoreError::Conflict(msg),
        }
    }
}

/// Map SQLx errors to `StoreError`.
///
/// | SQLx error | Postgres code | StoreError |
/// |---|---|---|
/// | unique violation | `23505` | `Conflict` |
/// | check / not-null violation | `23514` / `23502` | `Validation` |
/// | anything else | | `Backend` |
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("23514") | Some("23502") => StoreError::Validation(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {operation}")),
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_onto_store_errors() {
        assert_eq!(
            StoreError::from(DomainError::validation("name cannot be empty")),
            StoreError::Validation("name cannot be empty".to_string())
        );
        assert_eq!(
            StoreError::from(DomainError::invariant("size M twice")),
            StoreError::Validation("size M twice".to_string())
        );
        assert_eq!(StoreError::from(DomainError::not_found()), StoreError::NotFound);
        assert!(matches!(
            StoreError::from(DomainError::invalid_id("bad")),
            StoreError::InvalidId(_)
        ));
    }

    #[test]
    fn row_not_found_is_not_found() {
        assert_eq!(map_sqlx_error("get", sqlx::Error::RowNotFound), StoreError::NotFound);
        assert!(matches!(
            map_sqlx_error("get", sqlx::Error::PoolClosed),
            StoreError::Backend(_)
        ));
    }
}
