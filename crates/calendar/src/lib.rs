//! # Cyclebook Work-Cycle Calendar
//!
//! Partitions the calendar into fixed 14-day cycles (11 work days followed by
//! 3 rest days) counted from a Thursday epoch, and answers every question the
//! reporting layers ask about them.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Pure, synchronous date arithmetic. It depends only on
//!   `core-types` (Layer 0).
//! - **Cycles are values:** a `WorkCycle` is a pure function of its number and
//!   is recomputed whenever needed, never stored.
//! - **Injected "today":** every query relative to the present goes through a
//!   `CycleLocator` that pins its reference date once.
//!
//! ## Public API
//!
//! - `CycleCalendar` / `build_cycle`: the cycle generator.
//! - `CycleLocator`: date-to-cycle mapping, windows, and current-position info.
//! - `initial_schedule`: the tabular listing of the first cycles.
//! - `CalendarError`: the specific error types that can be returned from this crate.

pub mod cycle;
pub mod error;
pub mod locator;
pub mod schedule;

pub use cycle::{
    CYCLE_LENGTH_DAYS, CycleCalendar, CycleFlags, DayPhase, REST_DAYS, WORK_DAYS, WorkCycle,
    build_cycle, cycle_number_for_date, system_start_date,
};
pub use error::CalendarError;
pub use locator::{CycleInfo, CycleLocator, CycleStatus, is_in_rest_period, is_in_work_period};
pub use schedule::{ScheduleRow, initial_schedule};
