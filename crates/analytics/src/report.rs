use crate::aggregate::CycleAggregate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cross-cycle statistics over an ordered list of cycle aggregates.
///
/// This struct is the final output of `summarize` and serves as the data
/// transfer object for portfolio results throughout the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    // I. Totals
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_investment: Decimal,
    pub total_balance: Decimal,

    // II. Unweighted per-cycle averages
    pub average_roi: Decimal,
    pub average_efficiency: Decimal,
    pub average_productivity: Decimal,
    pub average_burn_rate: Decimal,
    pub average_investment_ratio: Decimal,

    // III. Extremes (None only when no cycles were analyzed)
    pub best_cycle: Option<CycleAggregate>,
    pub worst_cycle: Option<CycleAggregate>,

    // IV. Trend
    /// `100 - stddev(efficiency)`, floored at 0.
    pub consistency_score: Decimal,
    /// Second-half mean balance against first-half mean balance, in percent.
    pub growth_rate: Decimal,

    pub total_active_days: usize,
    pub cycles_analyzed: usize,
}

impl PortfolioSummary {
    /// Creates a new, zeroed-out summary.
    /// This is what an empty list of aggregates summarizes to.
    pub fn new() -> Self {
        Self {
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            total_investment: Decimal::ZERO,
            total_balance: Decimal::ZERO,
            average_roi: Decimal::ZERO,
            average_efficiency: Decimal::ZERO,
            average_productivity: Decimal::ZERO,
            average_burn_rate: Decimal::ZERO,
            average_investment_ratio: Decimal::ZERO,
            best_cycle: None,
            worst_cycle: None,
            consistency_score: Decimal::ZERO,
            growth_rate: Decimal::ZERO,
            total_active_days: 0,
            cycles_analyzed: 0,
        }
    }
}

impl Default for PortfolioSummary {
    fn default() -> Self {
        Self::new()
    }
}
