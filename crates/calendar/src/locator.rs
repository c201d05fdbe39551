use crate::cycle::{CYCLE_LENGTH_DAYS, CycleCalendar, WORK_DAYS, WorkCycle};
use crate::error::CalendarError;
use chrono::NaiveDate;
use core_types::{CalendarDay, days_between, today};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where "today" sits in the cycle system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleStatus {
    Work,
    Rest,
    BeforeSystem,
}

/// Position of the reference day within its cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInfo {
    /// The current cycle. Before the epoch this is cycle 1, kept only so the
    /// struct is complete; it is not "current" in that case.
    pub cycle: WorkCycle,
    /// 1..=14, or 0 before the epoch.
    pub day_number: u32,
    /// 1..=11 on work days, 0 otherwise.
    pub work_day_number: u32,
    /// 1..=3 on rest days, 0 otherwise.
    pub rest_day_number: u32,
    pub days_until_next_cycle: i64,
    pub status: CycleStatus,
}

impl CycleInfo {
    /// Share of the 14-day cycle elapsed, counting today, in `[0, 100]`.
    pub fn cycle_progress(&self) -> Decimal {
        if self.status == CycleStatus::BeforeSystem {
            return Decimal::ZERO;
        }
        percentage(self.day_number, CYCLE_LENGTH_DAYS)
    }

    /// Share of the work window elapsed, in `[0, 100]`. A cycle in its rest
    /// window has completed its work.
    pub fn work_progress(&self) -> Decimal {
        match self.status {
            CycleStatus::BeforeSystem => Decimal::ZERO,
            CycleStatus::Rest => Decimal::ONE_HUNDRED,
            CycleStatus::Work => percentage(self.work_day_number, WORK_DAYS),
        }
    }
}

fn percentage(part: u32, whole: u32) -> Decimal {
    (Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
}

/// Answers cycle questions relative to one pinned reference day.
///
/// The reference day is read once when the locator is created, so every
/// answer from the same locator agrees on what "today" is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleLocator {
    calendar: CycleCalendar,
    today: NaiveDate,
}

impl CycleLocator {
    pub fn new(calendar: CycleCalendar, today: NaiveDate) -> Self {
        Self { calendar, today }
    }

    /// A locator pinned to the host's current local day.
    pub fn from_clock(calendar: CycleCalendar) -> Self {
        Self::new(calendar, today())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn calendar(&self) -> &CycleCalendar {
        &self.calendar
    }

    pub fn cycle_number_for_date(&self, day: NaiveDate) -> u32 {
        self.calendar.cycle_number_for_date(day)
    }

    pub fn current_cycle_number(&self) -> u32 {
        self.cycle_number_for_date(self.today)
    }

    pub fn is_before_system(&self) -> bool {
        self.current_cycle_number() == 0
    }

    /// The cycle containing today, or `None` before the epoch.
    pub fn current_cycle(&self) -> Result<Option<WorkCycle>, CalendarError> {
        self.cycle_for_date(self.today)
    }

    /// The cycle containing `day`, or `None` before the epoch.
    pub fn cycle_for_date(&self, day: NaiveDate) -> Result<Option<WorkCycle>, CalendarError> {
        match self.cycle_number_for_date(day) {
            0 => Ok(None),
            n => self.calendar.build_cycle(n).map(Some),
        }
    }

    /// `count` consecutive cycles roughly centred on the current one, never
    /// starting below cycle 1.
    pub fn cycles_window(&self, count: u32) -> Result<Vec<WorkCycle>, CalendarError> {
        if count == 0 {
            return Err(CalendarError::InvalidArgument(
                "a cycle window needs at least one cycle".to_string(),
            ));
        }

        let current = i64::from(self.current_cycle_number());
        let start = (current - i64::from(count / 2)).max(1) as u32;
        tracing::debug!(current, start, count, "Building cycle window");

        (0..count)
            .map(|i| {
                let n = start.checked_add(i).ok_or_else(|| {
                    CalendarError::InvalidArgument(format!("cycle window from {start} overflows"))
                })?;
                self.calendar.build_cycle(n)
            })
            .collect()
    }

    /// Everything a dashboard needs to know about today's place in its cycle.
    pub fn current_cycle_info(&self) -> Result<CycleInfo, CalendarError> {
        let today = self.today;

        let Some(cycle) = self.current_cycle()? else {
            return Ok(CycleInfo {
                cycle: self.calendar.build_cycle(1)?,
                day_number: 0,
                work_day_number: 0,
                rest_day_number: 0,
                days_until_next_cycle: days_between(today, self.calendar.epoch()),
                status: CycleStatus::BeforeSystem,
            });
        };

        let day_number = (days_between(cycle.work_start, today) + 1) as u32;
        let work_day_number = cycle.work_day_number(&today).unwrap_or(0);
        let rest_day_number = cycle.rest_day_number(&today).unwrap_or(0);
        let status = if work_day_number > 0 {
            CycleStatus::Work
        } else {
            CycleStatus::Rest
        };
        let days_until_next_cycle = days_between(today, cycle.next_cycle_start).max(0);

        Ok(CycleInfo {
            cycle,
            day_number,
            work_day_number,
            rest_day_number,
            days_until_next_cycle,
            status,
        })
    }

    pub fn cycle_progress(&self) -> Result<Decimal, CalendarError> {
        Ok(self.current_cycle_info()?.cycle_progress())
    }

    pub fn work_progress(&self) -> Result<Decimal, CalendarError> {
        Ok(self.current_cycle_info()?.work_progress())
    }
}

/// True when `day` is one of `cycle`'s work days.
pub fn is_in_work_period<T: CalendarDay + ?Sized>(day: &T, cycle: &WorkCycle) -> bool {
    cycle.is_work_day(day)
}

/// True when `day` is one of `cycle`'s rest days.
pub fn is_in_rest_period<T: CalendarDay + ?Sized>(day: &T, cycle: &WorkCycle) -> bool {
    cycle.is_rest_day(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn at(day: NaiveDate) -> CycleLocator {
        CycleLocator::new(CycleCalendar::default(), day)
    }

    #[test]
    fn before_system_info() {
        let info = at(d(2025, 6, 20)).current_cycle_info().unwrap();
        assert_eq!(info.status, CycleStatus::BeforeSystem);
        assert_eq!(info.cycle.cycle_number, 1);
        assert_eq!(info.day_number, 0);
        assert_eq!(info.work_day_number, 0);
        assert_eq!(info.rest_day_number, 0);
        assert_eq!(info.days_until_next_cycle, 6);
        assert_eq!(info.cycle_progress(), Decimal::ZERO);
        assert_eq!(info.work_progress(), Decimal::ZERO);
        assert!(at(d(2025, 6, 20)).current_cycle().unwrap().is_none());
    }

    #[test]
    fn first_work_day_info() {
        let info = at(d(2025, 6, 26)).current_cycle_info().unwrap();
        assert_eq!(info.status, CycleStatus::Work);
        assert_eq!(info.day_number, 1);
        assert_eq!(info.work_day_number, 1);
        assert_eq!(info.rest_day_number, 0);
        assert_eq!(info.days_until_next_cycle, 14);
        assert_eq!(info.cycle_progress().round_dp(2), dec!(7.14));
    }

    #[test]
    fn last_rest_day_info() {
        let info = at(d(2025, 7, 9)).current_cycle_info().unwrap();
        assert_eq!(info.status, CycleStatus::Rest);
        assert_eq!(info.day_number, 14);
        assert_eq!(info.work_day_number, 0);
        assert_eq!(info.rest_day_number, 3);
        assert_eq!(info.days_until_next_cycle, 1);
        assert_eq!(info.cycle_progress(), dec!(100));
        assert_eq!(info.work_progress(), dec!(100));
    }

    #[test]
    fn mid_cycle_progress() {
        // 2025-07-02 is day 7 of cycle 1 and its 7th work day.
        let locator = at(d(2025, 7, 2));
        assert_eq!(locator.cycle_progress().unwrap(), dec!(50));
        let work = locator.work_progress().unwrap();
        assert_eq!(work.round_dp(2), dec!(63.64));
    }

    #[test]
    fn eleventh_work_day_completes_work_progress() {
        assert_eq!(at(d(2025, 7, 6)).work_progress().unwrap(), dec!(100));
    }

    #[test]
    fn window_is_centred_and_clamped() {
        let early = at(d(2025, 7, 1)).cycles_window(10).unwrap();
        assert_eq!(early.len(), 10);
        assert_eq!(early[0].cycle_number, 1);

        // 2025-10-16 falls in cycle 9.
        let later = at(d(2025, 10, 16)).cycles_window(6).unwrap();
        let numbers: Vec<u32> = later.iter().map(|c| c.cycle_number).collect();
        assert_eq!(numbers, vec![6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn window_before_system_starts_at_one() {
        let window = at(d(2024, 1, 1)).cycles_window(3).unwrap();
        assert_eq!(window[0].cycle_number, 1);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn empty_window_is_rejected() {
        assert!(at(d(2025, 7, 1)).cycles_window(0).is_err());
    }

    #[test]
    fn membership_accepts_strings_and_dates() {
        let cycle = CycleCalendar::default().build_cycle(1).unwrap();
        assert!(is_in_work_period("2025-06-27", &cycle));
        assert!(is_in_rest_period(&d(2025, 7, 9), &cycle));
        assert!(!is_in_work_period(&d(2025, 7, 9), &cycle));
        assert!(!is_in_rest_period("2025-07-10", &cycle));
    }
}
