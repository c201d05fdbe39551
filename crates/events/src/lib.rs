//! # Cyclebook Events
//!
//! This crate defines the change notifications the storage layer emits whenever
//! the entry collection changes. Consumers treat every event as "something
//! changed, reload": no delta contract is implied by the payloads.
//!
//! As a Layer 0 crate, it depends only on `core-types`.

// Declare the modules that make up this crate.
pub mod error;
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use error::EventsError;
pub use messages::{EntryEvent, RemoteChange};
