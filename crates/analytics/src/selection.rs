use crate::error::AnalyticsError;
use calendar::{CycleLocator, WorkCycle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which cycles of the reporting window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodSelection {
    /// Only the cycle containing today (cycle 1 before the epoch).
    Current,
    /// The trailing `recent` cycles of the window.
    Recent,
    #[default]
    All,
}

impl PeriodSelection {
    /// Picks cycles out of a `window_size` window centred on today.
    pub fn select_cycles(
        self,
        locator: &CycleLocator,
        window_size: u32,
        recent: usize,
    ) -> Result<Vec<WorkCycle>, AnalyticsError> {
        let cycles = match self {
            PeriodSelection::Current => vec![locator.current_cycle_info()?.cycle],
            PeriodSelection::Recent => {
                let window = locator.cycles_window(window_size)?;
                let skip = window.len().saturating_sub(recent);
                window.into_iter().skip(skip).collect()
            }
            PeriodSelection::All => locator.cycles_window(window_size)?,
        };
        tracing::debug!(selection = %self, count = cycles.len(), "Selected cycles");
        Ok(cycles)
    }
}

impl fmt::Display for PeriodSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodSelection::Current => "current",
            PeriodSelection::Recent => "recent",
            PeriodSelection::All => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for PeriodSelection {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(PeriodSelection::Current),
            "recent" => Ok(PeriodSelection::Recent),
            "all" => Ok(PeriodSelection::All),
            other => Err(AnalyticsError::InvalidInput(format!(
                "unknown period '{other}', expected current, recent or all"
            ))),
        }
    }
}
