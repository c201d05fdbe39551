use crate::aggregate::{CycleAggregate, ratio_pct, saturating_sum};
use crate::error::AnalyticsError;
use crate::report::PortfolioSummary;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Summarizes an ordered list of cycle aggregates.
///
/// An empty list yields the zeroed `PortfolioSummary::new()` with no best or
/// worst cycle. Use `try_summarize` when an empty list should be an error.
pub fn summarize(aggregates: &[CycleAggregate]) -> PortfolioSummary {
    try_summarize(aggregates).unwrap_or_else(|_| PortfolioSummary::new())
}

/// Summarizes an ordered, non-empty list of cycle aggregates.
///
/// Sums saturate at the `Decimal` bounds and ratios that do not fit fall back
/// to 0, so every field is always filled in.
///
/// # Errors
///
/// `AnalyticsError::EmptyInput` for an empty list.
pub fn try_summarize(aggregates: &[CycleAggregate]) -> Result<PortfolioSummary, AnalyticsError> {
    if aggregates.is_empty() {
        return Err(AnalyticsError::EmptyInput);
    }

    let mut report = PortfolioSummary::new();
    report.cycles_analyzed = aggregates.len();

    calculate_totals(aggregates, &mut report);
    calculate_averages(aggregates, &mut report);
    calculate_extremes(aggregates, &mut report);
    calculate_consistency(aggregates, &mut report);
    calculate_growth(aggregates, &mut report);

    tracing::debug!(
        cycles = report.cycles_analyzed,
        balance = %report.total_balance,
        consistency = %report.consistency_score,
        growth = %report.growth_rate,
        "Summarized portfolio"
    );

    Ok(report)
}

fn calculate_totals(aggregates: &[CycleAggregate], report: &mut PortfolioSummary) {
    report.total_income = saturating_sum(aggregates.iter().map(|a| a.income));
    report.total_expense = saturating_sum(aggregates.iter().map(|a| a.expense));
    report.total_investment = saturating_sum(aggregates.iter().map(|a| a.investment));
    report.total_active_days = aggregates.iter().map(|a| a.active_days).sum();
    report.total_balance = report.total_income.saturating_sub(report.total_investment);
}

fn calculate_averages(aggregates: &[CycleAggregate], report: &mut PortfolioSummary) {
    report.average_roi = mean(aggregates.iter().map(|a| a.roi));
    report.average_efficiency = mean(aggregates.iter().map(|a| a.efficiency));
    report.average_productivity = mean(aggregates.iter().map(|a| a.productivity));
    report.average_burn_rate = mean(aggregates.iter().map(|a| a.burn_rate));
    report.average_investment_ratio = mean(aggregates.iter().map(|a| a.investment_ratio));
}

/// Best and worst by balance; ties keep the leftmost aggregate.
fn calculate_extremes(aggregates: &[CycleAggregate], report: &mut PortfolioSummary) {
    let mut best = &aggregates[0];
    let mut worst = &aggregates[0];
    for aggregate in &aggregates[1..] {
        if aggregate.balance > best.balance {
            best = aggregate;
        }
        if aggregate.balance < worst.balance {
            worst = aggregate;
        }
    }
    report.best_cycle = Some(best.clone());
    report.worst_cycle = Some(worst.clone());
}

/// Population standard deviation of efficiency, subtracted from 100 and
/// floored at 0.
///
/// A variance too large for a `Decimal` means a deviation far above 100, so
/// the score is 0. A failed square root counts as no deviation.
fn calculate_consistency(aggregates: &[CycleAggregate], report: &mut PortfolioSummary) {
    let mean_efficiency = report.average_efficiency;

    let mut squared_sum = Decimal::ZERO;
    for aggregate in aggregates {
        let next = aggregate
            .efficiency
            .checked_sub(mean_efficiency)
            .and_then(|deviation| deviation.checked_mul(deviation))
            .and_then(|square| squared_sum.checked_add(square));
        match next {
            Some(sum) => squared_sum = sum,
            None => {
                tracing::warn!(%mean_efficiency, "Efficiency variance overflowed, consistency is 0");
                report.consistency_score = Decimal::ZERO;
                return;
            }
        }
    }
    let variance = squared_sum / Decimal::from(aggregates.len());

    let std_dev = variance.sqrt().unwrap_or_else(|| {
        tracing::warn!(%variance, "Square root of variance failed, treating deviation as 0");
        Decimal::ZERO
    });

    report.consistency_score = (Decimal::ONE_HUNDRED - std_dev).max(Decimal::ZERO);
}

/// Compares the mean balance of the later half of the cycles with the earlier
/// half. With fewer than two cycles there is no earlier half and the rate is 0.
fn calculate_growth(aggregates: &[CycleAggregate], report: &mut PortfolioSummary) {
    if aggregates.len() < 2 {
        report.growth_rate = Decimal::ZERO;
        return;
    }

    let (first_half, second_half) = aggregates.split_at(aggregates.len() / 2);
    let first_mean = mean(first_half.iter().map(|a| a.balance));
    let second_mean = mean(second_half.iter().map(|a| a.balance));

    report.growth_rate = if first_mean.is_zero() {
        Decimal::ZERO
    } else {
        ratio_pct(second_mean.saturating_sub(first_mean), first_mean.abs())
    };
}

fn mean(values: impl Iterator<Item = Decimal>) -> Decimal {
    let values: Vec<Decimal> = values.collect();
    if values.is_empty() {
        return Decimal::ZERO;
    }
    saturating_sum(values.iter().copied()) / Decimal::from(values.len())
}
