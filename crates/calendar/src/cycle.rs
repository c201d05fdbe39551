use crate::error::CalendarError;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use core_types::{CalendarDay, days_between, same_day};
use serde::{Deserialize, Serialize};

/// Total length of one cycle.
pub const CYCLE_LENGTH_DAYS: u32 = 14;
/// Length of the work window at the start of every cycle.
pub const WORK_DAYS: u32 = 11;
/// Length of the rest window that closes every cycle.
pub const REST_DAYS: u32 = 3;

const SYSTEM_START: (i32, u32, u32) = (2025, 6, 26);

/// The first day of cycle 1: Thursday 26 June 2025.
pub fn system_start_date() -> NaiveDate {
    let (year, month, day) = SYSTEM_START;
    NaiveDate::from_ymd_opt(year, month, day).expect("system start is a valid calendar day")
}

/// Where a given day sits relative to one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPhase {
    Work,
    Rest,
    Outside,
}

/// Flags describing a cycle as seen from one reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleFlags {
    pub is_active: bool,
    pub is_work_period: bool,
    pub is_rest_period: bool,
}

/// One 14-day cycle: 11 work days followed by 3 rest days.
///
/// A cycle is fully determined by its number and the calendar's epoch, so two
/// cycles built from the same inputs are always equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCycle {
    pub cycle_number: u32,
    pub work_start: NaiveDate,
    pub work_end: NaiveDate,
    pub rest_start: NaiveDate,
    pub rest_end: NaiveDate,
    /// Equal to the next cycle's `work_start`.
    pub next_cycle_start: NaiveDate,
    pub work_days: Vec<NaiveDate>,
    pub rest_days: Vec<NaiveDate>,
}

impl WorkCycle {
    /// True when `day` is one of the 11 work days.
    pub fn is_work_day<T: CalendarDay + ?Sized>(&self, day: &T) -> bool {
        self.work_days.iter().any(|work_day| same_day(work_day, day))
    }

    /// True when `day` is one of the 3 rest days.
    pub fn is_rest_day<T: CalendarDay + ?Sized>(&self, day: &T) -> bool {
        self.rest_days.iter().any(|rest_day| same_day(rest_day, day))
    }

    pub fn phase_on<T: CalendarDay + ?Sized>(&self, day: &T) -> DayPhase {
        if self.is_work_day(day) {
            DayPhase::Work
        } else if self.is_rest_day(day) {
            DayPhase::Rest
        } else {
            DayPhase::Outside
        }
    }

    /// True when `day` falls anywhere in `[work_start, rest_end]`.
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.work_start && day <= self.rest_end
    }

    /// The cycle's flags relative to `reference`, typically "today".
    pub fn flags_on(&self, reference: NaiveDate) -> CycleFlags {
        let phase = self.phase_on(&reference);
        CycleFlags {
            is_active: self.contains(reference),
            is_work_period: phase == DayPhase::Work,
            is_rest_period: phase == DayPhase::Rest,
        }
    }

    /// 1-based position of `day` within the work days, if it is one.
    pub fn work_day_number<T: CalendarDay + ?Sized>(&self, day: &T) -> Option<u32> {
        position(&self.work_days, day)
    }

    /// 1-based position of `day` within the rest days, if it is one.
    pub fn rest_day_number<T: CalendarDay + ?Sized>(&self, day: &T) -> Option<u32> {
        position(&self.rest_days, day)
    }

    /// Human-readable label, e.g. `Cycle 1: Thu 26 Jun - Sun 6 Jul`.
    pub fn label(&self) -> String {
        format!(
            "Cycle {}: {}",
            self.cycle_number,
            short_range(self.work_start, self.work_end)
        )
    }
}

fn position<T: CalendarDay + ?Sized>(days: &[NaiveDate], day: &T) -> Option<u32> {
    days.iter()
        .position(|candidate| same_day(candidate, day))
        .map(|index| index as u32 + 1)
}

pub(crate) fn short_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%a %-d %b"), end.format("%a %-d %b"))
}

/// The cycle generator: maps cycle numbers to cycles and days to cycle numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCalendar {
    epoch: NaiveDate,
}

impl Default for CycleCalendar {
    fn default() -> Self {
        Self {
            epoch: system_start_date(),
        }
    }
}

impl CycleCalendar {
    /// A calendar whose cycle 1 starts on `epoch`, which must be a Thursday.
    pub fn with_epoch(epoch: NaiveDate) -> Result<Self, CalendarError> {
        if epoch.weekday() != Weekday::Thu {
            return Err(CalendarError::InvalidArgument(format!(
                "cycle epoch {epoch} is a {:?}, not a Thursday",
                epoch.weekday()
            )));
        }
        let calendar = Self { epoch };
        // The first cycle must be representable for the calendar to be usable at all.
        calendar.build_cycle(1)?;
        Ok(calendar)
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    /// Builds cycle `cycle_number` (1-based).
    pub fn build_cycle(&self, cycle_number: u32) -> Result<WorkCycle, CalendarError> {
        if cycle_number == 0 {
            return Err(CalendarError::InvalidArgument(
                "cycle numbers start at 1".to_string(),
            ));
        }

        let offset = u64::from(cycle_number - 1) * u64::from(CYCLE_LENGTH_DAYS);
        let work_start = shift(self.epoch, offset, cycle_number)?;
        let work_end = shift(work_start, u64::from(WORK_DAYS - 1), cycle_number)?;
        let rest_start = shift(work_end, 1, cycle_number)?;
        let rest_end = shift(rest_start, u64::from(REST_DAYS - 1), cycle_number)?;
        let next_cycle_start = shift(rest_end, 1, cycle_number)?;

        let work_days: Vec<NaiveDate> = work_start.iter_days().take(WORK_DAYS as usize).collect();
        let rest_days: Vec<NaiveDate> = rest_start.iter_days().take(REST_DAYS as usize).collect();

        Ok(WorkCycle {
            cycle_number,
            work_start,
            work_end,
            rest_start,
            rest_end,
            next_cycle_start,
            work_days,
            rest_days,
        })
    }

    /// The number of the cycle containing `day`, or 0 when `day` is before the epoch.
    pub fn cycle_number_for_date(&self, day: NaiveDate) -> u32 {
        if day < self.epoch {
            return 0;
        }
        let elapsed = days_between(self.epoch, day);
        (elapsed / i64::from(CYCLE_LENGTH_DAYS)) as u32 + 1
    }
}

fn shift(date: NaiveDate, days: u64, cycle_number: u32) -> Result<NaiveDate, CalendarError> {
    date.checked_add_days(Days::new(days)).ok_or_else(|| {
        CalendarError::InvalidArgument(format!(
            "cycle {cycle_number} lies outside the supported date range"
        ))
    })
}

/// Builds a cycle on the default calendar.
pub fn build_cycle(cycle_number: u32) -> Result<WorkCycle, CalendarError> {
    CycleCalendar::default().build_cycle(cycle_number)
}

/// Maps a day to its cycle number on the default calendar (0 before the epoch).
pub fn cycle_number_for_date(day: NaiveDate) -> u32 {
    CycleCalendar::default().cycle_number_for_date(day)
}
