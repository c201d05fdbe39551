//! # Cyclebook Database Crate
//!
//! This crate is the data-access collaborator: it owns the financial entries
//! and tells the rest of the application when they change.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** All storage-specific logic lives here behind the
//!   `EntryRepository` trait, so the calendar and analytics crates never see SQL.
//! - **Runtime-checked SQL:** queries go through `sqlx::query` / `query_as` with
//!   bound parameters, so the crate builds without a live database.
//! - **Change feed:** every repository exposes a `broadcast` channel of
//!   `EntryEvent`s. The PostgreSQL store also forwards `pg_notify` messages
//!   from other writers.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations` / `database_url`: PostgreSQL pool setup.
//! - `EntryRepository`: list, create, update and delete entries.
//! - `PgRepository`, `InMemoryRepository`: the two implementations.
//! - `subscribe_to_changes` / `Subscription`: callback-style change notifications.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod subscription;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, database_url, run_migrations};
pub use error::DbError;
pub use memory::InMemoryRepository;
pub use repository::{CHANGE_CHANNEL, EntryRepository, PgRepository};
pub use subscription::{Subscription, subscribe_to_changes};
