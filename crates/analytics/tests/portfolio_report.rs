//! Runs the full report pipeline: entries -> cycles -> aggregates -> summary -> insights.

use analytics::{
    InsightKind, PeriodSelection, aggregate_many, category_breakdown, category_insights,
    portfolio_insights, summarize,
};
use calendar::{CycleCalendar, CycleLocator};
use chrono::{NaiveDate, Utc};
use configuration::InsightThresholds;
use core_types::{EntryType, FinancialEntry, NewEntry};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn entry(entry_type: EntryType, category: &str, amount: Decimal, date: &str) -> FinancialEntry {
    FinancialEntry::from_new(
        NewEntry {
            entry_type,
            category: category.into(),
            amount,
            date: core_types::from_canonical(date).unwrap(),
            description: None,
        },
        Utc::now(),
    )
    .unwrap()
}

fn ledger() -> Vec<FinancialEntry> {
    vec![
        // Cycle 1: balance 800.
        entry(EntryType::Income, "Salary", dec!(1000), "2025-06-27"),
        entry(EntryType::Investment, "Index fund", dec!(200), "2025-06-27"),
        entry(EntryType::Expense, "Fuel", dec!(300), "2025-06-28"),
        // Cycle 2: balance 1200, one rest-day expense.
        entry(EntryType::Income, "Salary", dec!(1500), "2025-07-10"),
        entry(EntryType::Investment, "Index fund", dec!(300), "2025-07-15"),
        entry(EntryType::Expense, "Rent", dec!(900), "2025-07-22"),
        // Before the epoch: never part of any cycle.
        entry(EntryType::Income, "Salary", dec!(5000), "2025-06-01"),
    ]
}

#[test]
fn window_summary_and_insights() {
    let locator = CycleLocator::new(CycleCalendar::default(), NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
    let cycles = PeriodSelection::All.select_cycles(&locator, 4, 2).unwrap();
    assert_eq!(cycles.first().map(|c| c.cycle_number), Some(1));

    let entries = ledger();
    let aggregates = aggregate_many(&entries, &cycles);
    let numbers: Vec<u32> = aggregates.iter().map(|a| a.cycle.cycle_number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(aggregates[1].rest_entries.len(), 1);

    let summary = summarize(&aggregates);
    assert_eq!(summary.cycles_analyzed, 2);
    assert_eq!(summary.total_income, dec!(2500));
    assert_eq!(summary.total_balance, dec!(2000));
    assert_eq!(summary.growth_rate, dec!(50));
    assert_eq!(summary.best_cycle.as_ref().unwrap().cycle.cycle_number, 2);
    assert_eq!(summary.worst_cycle.as_ref().unwrap().cycle.cycle_number, 1);

    let insights = portfolio_insights(&summary, &InsightThresholds::default());
    assert!(insights.iter().any(|i| i.title == "Exceptional ROI"));
    assert!(insights.iter().any(|i| i.title == "Growing balance" && i.kind == InsightKind::Success));
    assert!(insights.iter().all(|i| i.title != "High burn rate"));
}

#[test]
fn category_view_of_a_cycle() {
    let entries = ledger();
    let cycle = CycleCalendar::default().build_cycle(2).unwrap();
    let in_cycle = aggregate_many(&entries, std::slice::from_ref(&cycle));
    let breakdown = category_breakdown(&in_cycle[0].entries);

    let rent = breakdown.top(EntryType::Expense).unwrap();
    assert_eq!(rent.category, "Rent");
    assert_eq!(rent.percentage, dec!(100));

    let insights = category_insights(&breakdown, &InsightThresholds::default());
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].kind, InsightKind::Warning);
}

#[test]
fn a_window_with_no_entries_summarizes_to_zero() {
    let locator = CycleLocator::new(CycleCalendar::default(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    let cycles = PeriodSelection::Recent.select_cycles(&locator, 12, 8).unwrap();
    let aggregates = aggregate_many(&[], &cycles);
    let summary = summarize(&aggregates);
    assert_eq!(summary.cycles_analyzed, 0);
    assert!(portfolio_insights(&summary, &InsightThresholds::default()).is_empty());
}
