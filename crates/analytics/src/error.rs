use calendar::CalendarError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: no cycle aggregates were supplied")]
    EmptyInput,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
