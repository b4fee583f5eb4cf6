//! Infrastructure layer: record stores (in-memory and Postgres) and
//! environment configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use store::{
    ClientStore, InMemoryClientStore, InMemoryPackingListStore, PackingListStore,
    PostgresClientStore, PostgresPackingListStore, StoreError,
};
