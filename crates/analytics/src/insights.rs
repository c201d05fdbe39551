use crate::categories::CategoryBreakdown;
use crate::report::PortfolioSummary;
use configuration::InsightThresholds;
use core_types::EntryType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
}

/// A short observation about the portfolio, ready to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl Insight {
    fn success(title: &str, message: String) -> Self {
        Self { kind: InsightKind::Success, title: title.to_string(), message }
    }

    fn warning(title: &str, message: String) -> Self {
        Self { kind: InsightKind::Warning, title: title.to_string(), message }
    }
}

/// Observations on a portfolio summary. A summary of no cycles yields none.
pub fn portfolio_insights(summary: &PortfolioSummary, thresholds: &InsightThresholds) -> Vec<Insight> {
    let mut insights = Vec::new();
    if summary.cycles_analyzed == 0 {
        return insights;
    }

    let roi = summary.average_roi;
    if roi > thresholds.exceptional_roi_pct {
        insights.push(Insight::success(
            "Exceptional ROI",
            format!("Average ROI of {}% - excellent return on investment", roi.round_dp(1)),
        ));
    } else if roi > Decimal::ZERO {
        insights.push(Insight::success(
            "Positive ROI",
            format!("Average ROI of {}%", roi.round_dp(1)),
        ));
    } else if roi < Decimal::ZERO {
        insights.push(Insight::warning(
            "Negative ROI",
            format!("Average ROI of {}% - review the investment strategy", roi.round_dp(1)),
        ));
    }

    if summary.average_efficiency > thresholds.high_efficiency_pct {
        insights.push(Insight::success(
            "High efficiency",
            format!("Average efficiency of {}%", summary.average_efficiency.round_dp(1)),
        ));
    }

    if summary.consistency_score > thresholds.high_consistency_score {
        insights.push(Insight::success(
            "Excellent consistency",
            format!("Consistency score of {} - stable performance", summary.consistency_score.round_dp(1)),
        ));
    }

    let growth = summary.growth_rate;
    if growth > thresholds.growth_alert_pct {
        insights.push(Insight::success(
            "Growing balance",
            format!("Balance grew {}% between the earlier and later cycles", growth.round_dp(1)),
        ));
    } else if growth < -thresholds.growth_alert_pct {
        insights.push(Insight::warning(
            "Declining balance",
            format!("Balance fell {}% between the earlier and later cycles", growth.abs().round_dp(1)),
        ));
    }

    if summary.average_burn_rate > thresholds.burn_rate_alert {
        insights.push(Insight::warning(
            "High burn rate",
            format!("{} spent per work day - keep operating costs in check", summary.average_burn_rate.round_dp(0)),
        ));
    }

    insights
}

/// Warns when a single category dominates expenses.
pub fn category_insights(breakdown: &CategoryBreakdown, thresholds: &InsightThresholds) -> Vec<Insight> {
    match breakdown.top(EntryType::Expense) {
        Some(top) if top.percentage > thresholds.expense_concentration_pct => {
            vec![Insight::warning(
                "Concentrated spending",
                format!("{} accounts for {}% of expenses", top.category, top.percentage.round_dp(1)),
            )]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryShare;
    use rust_decimal_macros::dec;

    fn summary() -> PortfolioSummary {
        PortfolioSummary { cycles_analyzed: 3, ..PortfolioSummary::new() }
    }

    fn kinds(insights: &[Insight]) -> Vec<(&str, InsightKind)> {
        insights.iter().map(|i| (i.title.as_str(), i.kind)).collect()
    }

    #[test]
    fn empty_summary_has_no_insights() {
        let mut empty = PortfolioSummary::new();
        empty.average_burn_rate = dec!(5000);
        assert!(portfolio_insights(&empty, &InsightThresholds::default()).is_empty());
    }

    #[test]
    fn roi_bands_are_exclusive() {
        let thresholds = InsightThresholds::default();
        let mut s = summary();

        s.average_roi = dec!(25);
        assert_eq!(kinds(&portfolio_insights(&s, &thresholds)), vec![("Exceptional ROI", InsightKind::Success)]);

        s.average_roi = dec!(20);
        assert_eq!(kinds(&portfolio_insights(&s, &thresholds)), vec![("Positive ROI", InsightKind::Success)]);

        s.average_roi = dec!(-3);
        assert_eq!(kinds(&portfolio_insights(&s, &thresholds)), vec![("Negative ROI", InsightKind::Warning)]);

        s.average_roi = Decimal::ZERO;
        assert!(portfolio_insights(&s, &thresholds).is_empty());
    }

    #[test]
    fn growth_and_burn_rate_alerts() {
        let thresholds = InsightThresholds::default();
        let mut s = summary();
        s.growth_rate = dec!(-12.5);
        s.average_burn_rate = dec!(1500);

        let insights = portfolio_insights(&s, &thresholds);
        assert_eq!(
            kinds(&insights),
            vec![("Declining balance", InsightKind::Warning), ("High burn rate", InsightKind::Warning)]
        );
        assert!(insights[0].message.contains("12.5%"));
    }

    #[test]
    fn thresholds_come_from_configuration() {
        let thresholds = InsightThresholds { high_consistency_score: dec!(95), ..Default::default() };
        let mut s = summary();
        s.consistency_score = dec!(90);
        assert!(portfolio_insights(&s, &thresholds).is_empty());
        s.consistency_score = dec!(96);
        assert_eq!(kinds(&portfolio_insights(&s, &thresholds)), vec![("Excellent consistency", InsightKind::Success)]);
    }

    #[test]
    fn dominant_expense_category_is_flagged() {
        let share = |percentage| CategoryShare {
            category: "Rent".into(),
            amount: dec!(600),
            percentage,
            entry_count: 1,
        };
        let thresholds = InsightThresholds::default();

        let dominant = CategoryBreakdown { expense: vec![share(dec!(60))], ..Default::default() };
        let insights = category_insights(&dominant, &thresholds);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].message.starts_with("Rent"));

        let spread = CategoryBreakdown { expense: vec![share(dec!(40))], ..Default::default() };
        assert!(category_insights(&spread, &thresholds).is_empty());
        assert!(category_insights(&CategoryBreakdown::default(), &thresholds).is_empty());
    }
}
