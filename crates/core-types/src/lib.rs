//! # Cyclebook Core Types
//!
//! Layer 0 of the workspace: the financial entry model shared by every other
//! crate, and the calendar-day arithmetic that keeps all date handling free of
//! time-of-day and timezone effects.

pub mod dates;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use dates::{CalendarDay, days_between, from_canonical, same_day, to_canonical, today};
pub use enums::EntryType;
pub use error::CoreError;
pub use structs::{EntryPatch, FinancialEntry, NewEntry};
