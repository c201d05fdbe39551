use crate::cycle::{CYCLE_LENGTH_DAYS, CycleCalendar, short_range};
use crate::error::CalendarError;
use serde::{Deserialize, Serialize};

/// One row of the published cycle schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub cycle_number: u32,
    pub work_period: String,
    pub rest_period: String,
    pub total_days: u32,
}

/// Lists the first `count` cycles of `calendar`, starting at cycle 1.
pub fn initial_schedule(
    calendar: &CycleCalendar,
    count: u32,
) -> Result<Vec<ScheduleRow>, CalendarError> {
    (1..=count)
        .map(|n| {
            let cycle = calendar.build_cycle(n)?;
            Ok(ScheduleRow {
                cycle_number: n,
                work_period: short_range(cycle.work_start, cycle.work_end),
                rest_period: short_range(cycle.rest_start, cycle.rest_end),
                total_days: CYCLE_LENGTH_DAYS,
            })
        })
        .collect()
}
