//! # Cyclebook Analytics Engine
//!
//! This crate turns a raw collection of financial entries into per-cycle and
//! portfolio-level figures. It acts as the "unbiased judge" of how each work
//! cycle went.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage.
//!   It depends on `core-types` (Layer 0) and the `calendar` crate.
//! - **Stateless Calculation:** every function takes the full entry collection and
//!   returns a fresh result. Nothing is cached, so callers simply recompute after
//!   any change to the entries.
//! - **No NaN:** every ratio guards its denominator explicitly and reports 0 when
//!   it would be undefined.
//!
//! ## Public API
//!
//! - `aggregate` / `aggregate_many`: bucket entries into cycles (`CycleAggregate`).
//! - `summarize` / `try_summarize`: cross-cycle statistics (`PortfolioSummary`).
//! - `category_breakdown`, `daily_totals`, `month_totals`: supporting breakdowns.
//! - `portfolio_insights`, `category_insights`: threshold-based observations.
//! - `PeriodSelection`: which cycles a report covers.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod categories;
pub mod daily;
pub mod engine;
pub mod error;
pub mod insights;
pub mod report;
pub mod selection;

// Re-export the key components to create a clean, public-facing API.
pub use aggregate::{CycleAggregate, aggregate, aggregate_many};
pub use categories::{CategoryBreakdown, CategoryShare, category_breakdown};
pub use daily::{DayTone, DayTotals, PeriodTotals, daily_totals, month_series, month_totals, overall_totals};
pub use engine::{summarize, try_summarize};
pub use error::AnalyticsError;
pub use insights::{Insight, InsightKind, category_insights, portfolio_insights};
pub use report::PortfolioSummary;
pub use selection::PeriodSelection;
