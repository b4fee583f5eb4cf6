//! Clients domain module.
//!
//! Business rules for client records (the consignees packing lists are
//! shipped to), implemented as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod client;

pub use client::{Address, Client, sort_by_name};
