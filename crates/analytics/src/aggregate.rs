use calendar::{DayPhase, WORK_DAYS, WorkCycle};
use core_types::{EntryType, FinancialEntry, same_day};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The financial picture of one cycle, derived from the entries dated inside it.
///
/// Recomputed on every query; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleAggregate {
    pub cycle: WorkCycle,
    /// Work and rest entries together, in input order.
    pub entries: Vec<FinancialEntry>,
    pub work_entries: Vec<FinancialEntry>,
    pub rest_entries: Vec<FinancialEntry>,

    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
    /// `income - investment`. Expenses are operating cost and do not reduce it.
    pub balance: Decimal,

    pub roi: Decimal,
    pub efficiency: Decimal,
    /// Income per work-period entry.
    pub productivity: Decimal,
    /// Expense per work day, always over the full 11-day work window.
    pub burn_rate: Decimal,
    pub investment_ratio: Decimal,
    /// Distinct work days with at least one work entry.
    pub active_days: usize,
}

impl CycleAggregate {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_for(&self, entry_type: EntryType) -> Decimal {
        match entry_type {
            EntryType::Income => self.income,
            EntryType::Expense => self.expense,
            EntryType::Investment => self.investment,
        }
    }
}

/// Buckets `entries` into `cycle` and computes its sums and ratios.
///
/// `entries` is the whole collection; entries outside the cycle are ignored.
pub fn aggregate(entries: &[FinancialEntry], cycle: &WorkCycle) -> CycleAggregate {
    let mut in_cycle = Vec::new();
    let mut work_entries = Vec::new();
    let mut rest_entries = Vec::new();

    for entry in entries {
        match cycle.phase_on(&entry.date) {
            DayPhase::Work => {
                work_entries.push(entry.clone());
                in_cycle.push(entry.clone());
            }
            DayPhase::Rest => {
                rest_entries.push(entry.clone());
                in_cycle.push(entry.clone());
            }
            DayPhase::Outside => {}
        }
    }

    let income = sum_of(&in_cycle, EntryType::Income);
    let expense = sum_of(&in_cycle, EntryType::Expense);
    let investment = sum_of(&in_cycle, EntryType::Investment);
    let balance = income.saturating_sub(investment);

    let roi = ratio_pct(balance, investment);
    let efficiency = ratio_pct(income.saturating_sub(expense).saturating_sub(investment), income);
    let investment_ratio = ratio_pct(investment, income);
    let productivity = if work_entries.is_empty() {
        Decimal::ZERO
    } else {
        income / Decimal::from(work_entries.len())
    };
    let burn_rate = expense / Decimal::from(WORK_DAYS);

    let active_days = cycle
        .work_days
        .iter()
        .filter(|day| work_entries.iter().any(|entry| same_day(&entry.date, *day)))
        .count();

    tracing::debug!(
        cycle = cycle.cycle_number,
        work = work_entries.len(),
        rest = rest_entries.len(),
        %income,
        %expense,
        %investment,
        "Aggregated cycle"
    );

    CycleAggregate {
        cycle: cycle.clone(),
        entries: in_cycle,
        work_entries,
        rest_entries,
        income,
        expense,
        investment,
        balance,
        roi,
        efficiency,
        productivity,
        burn_rate,
        investment_ratio,
        active_days,
    }
}

/// Aggregates every cycle in order and drops the cycles with no entries, so the
/// result can be shorter than `cycles`.
pub fn aggregate_many(entries: &[FinancialEntry], cycles: &[WorkCycle]) -> Vec<CycleAggregate> {
    cycles
        .iter()
        .map(|cycle| aggregate(entries, cycle))
        .filter(|aggregate| !aggregate.is_empty())
        .collect()
}

fn sum_of(entries: &[FinancialEntry], entry_type: EntryType) -> Decimal {
    saturating_sum(
        entries
            .iter()
            .filter(|entry| entry.is(entry_type))
            .map(|entry| entry.amount),
    )
}

/// Sums `values`, clamping at the Decimal bounds instead of overflowing.
pub(crate) fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    let mut total = Decimal::ZERO;
    for value in values {
        total = total.checked_add(value).unwrap_or_else(|| {
            tracing::warn!(%total, %value, "Sum overflowed, saturating");
            total.saturating_add(value)
        });
    }
    total
}

/// `numerator / denominator * 100`, or 0 when the denominator is not positive
/// or the result does not fit in a Decimal.
pub(crate) fn ratio_pct(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            tracing::warn!(%numerator, %denominator, "Ratio overflowed, reporting 0");
            Decimal::ZERO
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calendar::build_cycle;
    use chrono::{NaiveDate, Utc};
    use core_types::NewEntry;
    use rust_decimal_macros::dec;

    fn entry(entry_type: EntryType, amount: Decimal, date: &str) -> FinancialEntry {
        FinancialEntry::from_new(
            NewEntry {
                entry_type,
                category: "General".into(),
                amount,
                date: core_types::from_canonical(date).unwrap(),
                description: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn reference_scenario() {
        let entries = vec![
            entry(EntryType::Income, dec!(1000), "2025-06-27"),
            entry(EntryType::Investment, dec!(200), "2025-06-27"),
            entry(EntryType::Expense, dec!(300), "2025-06-28"),
        ];
        let agg = aggregate(&entries, &build_cycle(1).unwrap());

        assert_eq!(agg.income, dec!(1000));
        assert_eq!(agg.investment, dec!(200));
        assert_eq!(agg.expense, dec!(300));
        assert_eq!(agg.balance, dec!(800));
        assert_eq!(agg.roi, dec!(400));
        assert_eq!(agg.efficiency, dec!(50));
        assert_eq!(agg.investment_ratio, dec!(20));
        assert_eq!(agg.productivity.round_dp(2), dec!(333.33));
        assert_eq!(agg.burn_rate.round_dp(2), dec!(27.27));
        assert_eq!(agg.active_days, 2);
        assert_eq!(agg.work_entries.len(), 3);
        assert!(agg.rest_entries.is_empty());
    }

    #[test]
    fn empty_input_is_all_zero() {
        let agg = aggregate(&[], &build_cycle(4).unwrap());
        assert!(agg.is_empty());
        for value in [
            agg.income,
            agg.expense,
            agg.investment,
            agg.balance,
            agg.roi,
            agg.efficiency,
            agg.productivity,
            agg.burn_rate,
            agg.investment_ratio,
        ] {
            assert_eq!(value, Decimal::ZERO);
        }
        assert_eq!(agg.active_days, 0);
    }

    #[test]
    fn rest_end_belongs_to_its_own_cycle() {
        let entries = vec![entry(EntryType::Income, dec!(50), "2025-07-09")];
        let first = aggregate(&entries, &build_cycle(1).unwrap());
        let second = aggregate(&entries, &build_cycle(2).unwrap());

        assert_eq!(first.rest_entries.len(), 1);
        assert!(first.work_entries.is_empty());
        assert!(second.is_empty());
        // Rest-day income counts toward the cycle but not toward active days or productivity.
        assert_eq!(first.income, dec!(50));
        assert_eq!(first.active_days, 0);
        assert_eq!(first.productivity, Decimal::ZERO);
    }

    #[test]
    fn entries_keep_input_order() {
        let entries = vec![
            entry(EntryType::Expense, dec!(5), "2025-07-08"),
            entry(EntryType::Income, dec!(10), "2025-06-26"),
            entry(EntryType::Income, dec!(99), "2025-08-01"),
        ];
        let agg = aggregate(&entries, &build_cycle(1).unwrap());
        let ids: Vec<_> = agg.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![entries[0].id, entries[1].id]);
    }

    #[test]
    fn expenses_only_yield_zero_ratios_but_a_burn_rate() {
        let entries = vec![entry(EntryType::Expense, dec!(110), "2025-06-30")];
        let agg = aggregate(&entries, &build_cycle(1).unwrap());
        assert_eq!(agg.roi, Decimal::ZERO);
        assert_eq!(agg.efficiency, Decimal::ZERO);
        assert_eq!(agg.investment_ratio, Decimal::ZERO);
        assert_eq!(agg.burn_rate, dec!(10));
        assert_eq!(agg.balance, Decimal::ZERO);
    }

    #[test]
    fn aggregate_many_skips_empty_cycles() {
        let entries = vec![
            entry(EntryType::Income, dec!(100), "2025-06-26"),
            entry(EntryType::Income, dec!(100), "2025-07-24"),
        ];
        let cycles: Vec<WorkCycle> = (1..=3).map(|n| build_cycle(n).unwrap()).collect();
        let aggregates = aggregate_many(&entries, &cycles);
        let numbers: Vec<u32> = aggregates.iter().map(|a| a.cycle.cycle_number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_panicking() {
        let entries = vec![
            entry(EntryType::Income, dec!(50000000000000000000000000000), "2025-06-27"),
            entry(EntryType::Income, dec!(50000000000000000000000000000), "2025-06-28"),
            entry(EntryType::Expense, dec!(50000000000000000000000000000), "2025-06-28"),
            entry(EntryType::Investment, dec!(50000000000000000000000000000), "2025-06-29"),
        ];
        let agg = aggregate(&entries, &build_cycle(1).unwrap());
        assert_eq!(agg.income, Decimal::MAX);
        assert_eq!(agg.expense, dec!(50000000000000000000000000000));
        assert_eq!(agg.balance, Decimal::MAX - dec!(50000000000000000000000000000));
        assert_eq!(agg.active_days, 3);

        let summary = crate::engine::summarize(&[agg.clone(), agg]);
        assert_eq!(summary.cycles_analyzed, 2);
        assert_eq!(summary.total_income, Decimal::MAX);
    }

    #[test]
    fn same_day_entries_count_as_one_active_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 26).unwrap().to_string();
        let entries = vec![
            entry(EntryType::Income, dec!(1), &date),
            entry(EntryType::Expense, dec!(1), &date),
        ];
        assert_eq!(aggregate(&entries, &build_cycle(1).unwrap()).active_days, 1);
    }
}
