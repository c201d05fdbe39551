use crate::aggregate::saturating_sum;
use crate::error::AnalyticsError;
use chrono::{Datelike, NaiveDate};
use core_types::{EntryType, FinancialEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a calendar view should colour a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayTone {
    /// No entries at all.
    Empty,
    /// Income exceeded investment.
    Positive,
    /// Money went into investments.
    Investing,
    /// Only spending happened.
    Spending,
    /// Entries exist but none moved the needle.
    Neutral,
}

/// Sums for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
    pub entry_count: usize,
}

impl DayTotals {
    fn add(&mut self, entry: &FinancialEntry) {
        match entry.entry_type {
            EntryType::Income => self.income = saturating_sum([self.income, entry.amount]),
            EntryType::Expense => self.expense = saturating_sum([self.expense, entry.amount]),
            EntryType::Investment => {
                self.investment = saturating_sum([self.investment, entry.amount])
            }
        }
        self.entry_count += 1;
    }

    pub fn balance(&self) -> Decimal {
        self.income.saturating_sub(self.investment)
    }

    pub fn tone(&self) -> DayTone {
        if self.entry_count == 0 {
            DayTone::Empty
        } else if self.balance() > Decimal::ZERO {
            DayTone::Positive
        } else if self.investment > Decimal::ZERO {
            DayTone::Investing
        } else if self.expense > Decimal::ZERO {
            DayTone::Spending
        } else {
            DayTone::Neutral
        }
    }
}

/// Sums over an arbitrary span of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
    pub balance: Decimal,
}

impl PeriodTotals {
    fn from_days<'a>(days: impl Iterator<Item = &'a DayTotals>) -> Self {
        let days: Vec<&DayTotals> = days.collect();
        let income = saturating_sum(days.iter().map(|day| day.income));
        let investment = saturating_sum(days.iter().map(|day| day.investment));
        PeriodTotals {
            income,
            expense: saturating_sum(days.iter().map(|day| day.expense)),
            investment,
            balance: income.saturating_sub(investment),
        }
    }
}

/// Buckets entries by calendar day, in date order.
pub fn daily_totals<'a, I>(entries: I) -> BTreeMap<NaiveDate, DayTotals>
where
    I: IntoIterator<Item = &'a FinancialEntry>,
{
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    for entry in entries {
        days.entry(entry.date).or_default().add(entry);
    }
    days
}

/// Totals over every entry supplied.
pub fn overall_totals<'a, I>(entries: I) -> PeriodTotals
where
    I: IntoIterator<Item = &'a FinancialEntry>,
{
    PeriodTotals::from_days(daily_totals(entries).values())
}

/// Totals for the entries dated in `month` of `year`.
pub fn month_totals<'a, I>(entries: I, year: i32, month: u32) -> Result<PeriodTotals, AnalyticsError>
where
    I: IntoIterator<Item = &'a FinancialEntry>,
{
    let (first, last) = month_bounds(year, month)?;
    let days = daily_totals(entries);
    Ok(PeriodTotals::from_days(days.range(first..=last).map(|(_, totals)| totals)))
}

/// One row per day of the month, including days with no entries.
pub fn month_series<'a, I>(
    entries: I,
    year: i32,
    month: u32,
) -> Result<Vec<(NaiveDate, DayTotals)>, AnalyticsError>
where
    I: IntoIterator<Item = &'a FinancialEntry>,
{
    let (first, last) = month_bounds(year, month)?;
    let days = daily_totals(entries);
    Ok(first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| (day, days.get(&day).cloned().unwrap_or_default()))
        .collect())
}

fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AnalyticsError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AnalyticsError::InvalidInput(format!("{year}-{month:02} is not a month")))?;
    let last = first
        .iter_days()
        .take_while(|day| day.month() == month)
        .last()
        .unwrap_or(first);
    Ok((first, last))
}
