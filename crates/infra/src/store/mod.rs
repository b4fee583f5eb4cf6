//! Record stores for clients and packing lists.
//!
//! Two implementations of each trait: in-memory (dev/tests) and Postgres.
//! Both enforce the same rules: clients are validated before they are
//! written, packing-list codes must have the `LOMPL` shape, and listings
//! come back in display order (clients by name, packing lists newest first).

mod error;
mod in_memory;
mod postgres;

use async_trait::async_trait;

use lomartex_clients::Client;
use lomartex_core::ClientId;
use lomartex_packing::PackingList;

pub use error::StoreError;
pub use in_memory::{InMemoryClientStore, InMemoryPackingListStore};
pub use postgres::{PostgresClientStore, PostgresPackingListStore, connect, ensure_schema};

/// Default result count for client search (matches the entry form's picker).
pub const DEFAULT_CLIENT_SEARCH_LIMIT: usize = 5;

#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a validated client. `Conflict` if the id is taken.
    async fn create(&self, client: Client) -> Result<Client, StoreError>;

    async fn get(&self, id: ClientId) -> Result<Client, StoreError>;

    /// Replace an existing client. `NotFound` if it does not exist.
    async fn update(&self, client: Client) -> Result<Client, StoreError>;

    /// Insert or replace.
    async fn upsert(&self, client: Client) -> Result<Client, StoreError>;

    async fn delete(&self, id: ClientId) -> Result<(), StoreError>;

    /// All clients, name ascending.
    async fn list(&self) -> Result<Vec<Client>, StoreError>;

    /// Case-insensitive substring match on name or email, name ascending.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Client>, StoreError>;
}

#[async_trait]
pub trait PackingListStore: Send + Sync {
    /// Insert a packing list under its code. Stamps `createdAt`/`updatedAt`.
    async fn create(&self, list: PackingList) -> Result<PackingList, StoreError>;

    async fn get(&self, code: &str) -> Result<PackingList, StoreError>;

    /// Replace the stored list under `code`, keeping its `createdAt`.
    async fn update(&self, code: &str, list: PackingList) -> Result<PackingList, StoreError>;

    async fn delete(&self, code: &str) -> Result<(), StoreError>;

    /// All packing lists, newest first.
    async fn list(&self) -> Result<Vec<PackingList>, StoreError>;

    /// Case-insensitive substring match on the code, newest first.
    async fn search(&self, query: &str) -> Result<Vec<PackingList>, StoreError>;
}

/// Checks applied to every packing list before it is written.
pub(crate) fn check_packing_list(list: &PackingList) -> Result<(), StoreError> {
    lomartex_packing::PackingListCode::parse(&list.code)?;
    list.check_invariants()?;
    Ok(())
}
