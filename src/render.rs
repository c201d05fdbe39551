//! Terminal tables for the command handlers.

use analytics::{
    CategoryBreakdown, CategoryShare, CycleAggregate, DayTone, DayTotals, Insight, InsightKind,
    PeriodTotals, PortfolioSummary,
};
use calendar::{CycleInfo, CycleStatus, ScheduleRow, WorkCycle};
use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::dates::{format_for_display, weekday_name};
use core_types::{EntryType, FinancialEntry};
use rust_decimal::Decimal;

pub fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

pub fn pct(value: Decimal) -> String {
    format!("{:.1}%", value.round_dp(1))
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn status_lines(today: NaiveDate, info: &CycleInfo) -> Vec<String> {
    let mut lines = vec![format!("Today: {}", format_for_display(today))];
    match info.status {
        CycleStatus::BeforeSystem => {
            lines.push(format!(
                "The cycle system starts on {} {} ({} days).",
                weekday_name(info.cycle.work_start),
                info.cycle.work_start,
                info.days_until_next_cycle
            ));
        }
        CycleStatus::Work | CycleStatus::Rest => {
            let position = if info.status == CycleStatus::Work {
                format!("work day {} of {}", info.work_day_number, info.cycle.work_days.len())
            } else {
                format!("rest day {} of {}", info.rest_day_number, info.cycle.rest_days.len())
            };
            lines.push(format!("{} ({position}, day {} of 14)", info.cycle.label(), info.day_number));
            lines.push(format!(
                "Cycle progress {} | work progress {}",
                pct(info.cycle_progress()),
                pct(info.work_progress())
            ));
            lines.push(format!(
                "Next cycle starts {} (in {} days)",
                info.cycle.next_cycle_start, info.days_until_next_cycle
            ));
        }
    }
    lines
}

fn phase(cycle: &WorkCycle, today: NaiveDate) -> &'static str {
    let flags = cycle.flags_on(today);
    if flags.is_work_period {
        "work"
    } else if flags.is_rest_period {
        "rest"
    } else if cycle.work_start > today {
        "upcoming"
    } else {
        "done"
    }
}

pub fn cycles_table(cycles: &[WorkCycle], aggregates: &[CycleAggregate], today: NaiveDate) -> Table {
    let mut table = table(vec!["Cycle", "Work", "Rest", "Phase", "Income", "Expense", "Investment", "Balance"]);
    for cycle in cycles {
        let figures = aggregates.iter().find(|a| a.cycle.cycle_number == cycle.cycle_number);
        let amount = |pick: fn(&CycleAggregate) -> Decimal| figures.map(pick).map(money).unwrap_or_else(|| "-".into());
        table.add_row(vec![
            cycle.cycle_number.to_string(),
            format!("{} .. {}", cycle.work_start, cycle.work_end),
            format!("{} .. {}", cycle.rest_start, cycle.rest_end),
            phase(cycle, today).to_string(),
            amount(|a| a.income),
            amount(|a| a.expense),
            amount(|a| a.investment),
            amount(|a| a.balance),
        ]);
    }
    table
}

pub fn schedule_table(rows: &[ScheduleRow]) -> Table {
    let mut table = table(vec!["Cycle", "Work period", "Rest period", "Days"]);
    for row in rows {
        table.add_row(vec![
            row.cycle_number.to_string(),
            row.work_period.clone(),
            row.rest_period.clone(),
            row.total_days.to_string(),
        ]);
    }
    table
}

pub fn aggregates_table(aggregates: &[CycleAggregate]) -> Table {
    let mut table = table(vec![
        "Cycle", "Income", "Expense", "Investment", "Balance", "ROI", "Efficiency", "Burn/day",
        "Active days",
    ]);
    for a in aggregates {
        table.add_row(vec![
            a.cycle.cycle_number.to_string(),
            money(a.income),
            money(a.expense),
            money(a.investment),
            money(a.balance),
            pct(a.roi),
            pct(a.efficiency),
            money(a.burn_rate),
            format!("{}/{}", a.active_days, a.cycle.work_days.len()),
        ]);
    }
    table
}

pub fn summary_table(summary: &PortfolioSummary) -> Table {
    let cycle_number = |c: &Option<CycleAggregate>| {
        c.as_ref()
            .map(|a| format!("#{} ({})", a.cycle.cycle_number, money(a.balance)))
            .unwrap_or_else(|| "-".into())
    };
    let mut table = table(vec!["Metric", "Value"]);
    let rows = [
        ("Cycles analyzed", summary.cycles_analyzed.to_string()),
        ("Total income", money(summary.total_income)),
        ("Total expense", money(summary.total_expense)),
        ("Total investment", money(summary.total_investment)),
        ("Total balance", money(summary.total_balance)),
        ("Average ROI", pct(summary.average_roi)),
        ("Average efficiency", pct(summary.average_efficiency)),
        ("Average productivity", money(summary.average_productivity)),
        ("Average burn rate", money(summary.average_burn_rate)),
        ("Average investment ratio", pct(summary.average_investment_ratio)),
        ("Consistency score", summary.consistency_score.round_dp(1).to_string()),
        ("Growth rate", pct(summary.growth_rate)),
        ("Best cycle", cycle_number(&summary.best_cycle)),
        ("Worst cycle", cycle_number(&summary.worst_cycle)),
        ("Active work days", summary.total_active_days.to_string()),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    table
}

pub fn insight_lines(insights: &[Insight]) -> Vec<String> {
    insights
        .iter()
        .map(|insight| {
            let marker = match insight.kind {
                InsightKind::Success => "+",
                InsightKind::Warning => "!",
            };
            format!("[{marker}] {}: {}", insight.title, insight.message)
        })
        .collect()
}

pub fn categories_table(breakdown: &CategoryBreakdown) -> Table {
    let mut table = table(vec!["Type", "Category", "Amount", "Share", "Entries"]);
    for entry_type in EntryType::ALL {
        for CategoryShare { category, amount, percentage, entry_count } in breakdown.for_type(entry_type) {
            table.add_row(vec![
                entry_type.to_string(),
                category.clone(),
                money(*amount),
                pct(*percentage),
                entry_count.to_string(),
            ]);
        }
    }
    table
}

fn tone(tone: DayTone) -> &'static str {
    match tone {
        DayTone::Empty => "",
        DayTone::Positive => "positive",
        DayTone::Investing => "investing",
        DayTone::Spending => "spending",
        DayTone::Neutral => "neutral",
    }
}

pub fn month_table(series: &[(NaiveDate, DayTotals)], totals: &PeriodTotals) -> Table {
    let mut table = table(vec!["Date", "Day", "Income", "Expense", "Investment", "Balance", "Tone"]);
    for (date, day) in series.iter().filter(|(_, day)| day.entry_count > 0) {
        table.add_row(vec![
            date.to_string(),
            weekday_name(*date),
            money(day.income),
            money(day.expense),
            money(day.investment),
            money(day.balance()),
            tone(day.tone()).to_string(),
        ]);
    }
    table.add_row(vec![
        "Total".to_string(),
        String::new(),
        money(totals.income),
        money(totals.expense),
        money(totals.investment),
        money(totals.balance),
        String::new(),
    ]);
    table
}

pub fn entries_table(entries: &[FinancialEntry]) -> Table {
    let mut table = table(vec!["Id", "Date", "Type", "Category", "Amount", "Description"]);
    for entry in entries {
        table.add_row(vec![
            entry.id.to_string(),
            entry.date.to_string(),
            entry.entry_type.to_string(),
            entry.category.clone(),
            money(entry.amount),
            entry.description.clone().unwrap_or_default(),
        ]);
    }
    table
}

pub fn totals_line(label: &str, totals: &PeriodTotals) -> String {
    format!(
        "{label}: income {} | expense {} | investment {} | balance {}",
        money(totals.income),
        money(totals.expense),
        money(totals.investment),
        money(totals.balance)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use calendar::{CycleCalendar, CycleLocator};
    use rust_decimal_macros::dec;

    #[test]
    fn numbers_are_rounded_for_display() {
        assert_eq!(money(dec!(27.2727)), "27.27");
        assert_eq!(money(dec!(5)), "5.00");
        assert_eq!(pct(dec!(66.666)), "66.7%");
    }

    #[test]
    fn status_before_the_epoch_counts_down() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let info = CycleLocator::new(CycleCalendar::default(), today).current_cycle_info().unwrap();
        let lines = status_lines(today, &info);
        assert_eq!(lines[0], "Today: Friday 20 June");
        assert!(lines[1].contains("(6 days)"), "{}", lines[1]);
    }

    #[test]
    fn status_inside_a_cycle_names_the_day() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 8).unwrap();
        let info = CycleLocator::new(CycleCalendar::default(), today).current_cycle_info().unwrap();
        let lines = status_lines(today, &info);
        assert!(lines[1].starts_with("Cycle 1: Thu 26 Jun - Sun 6 Jul"), "{}", lines[1]);
        assert!(lines[1].contains("rest day 2 of 3"), "{}", lines[1]);
    }

    #[test]
    fn cycle_phases_relative_to_today() {
        let calendar = CycleCalendar::default();
        let today = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
        assert_eq!(phase(&calendar.build_cycle(1).unwrap(), today), "done");
        assert_eq!(phase(&calendar.build_cycle(2).unwrap(), today), "work");
        assert_eq!(phase(&calendar.build_cycle(3).unwrap(), today), "upcoming");
    }
}
