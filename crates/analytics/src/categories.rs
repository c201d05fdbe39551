use core_types::{EntryType, FinancialEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::aggregate::{ratio_pct, saturating_sum};

/// One category's share of its entry type's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// Share of the type total in percent; 0 when the total is 0.
    pub percentage: Decimal,
    pub entry_count: usize,
}

/// Per-type category totals, each list sorted by amount, largest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub expense: Vec<CategoryShare>,
    pub income: Vec<CategoryShare>,
    pub investment: Vec<CategoryShare>,
}

impl CategoryBreakdown {
    pub fn for_type(&self, entry_type: EntryType) -> &[CategoryShare] {
        match entry_type {
            EntryType::Expense => &self.expense,
            EntryType::Income => &self.income,
            EntryType::Investment => &self.investment,
        }
    }

    /// The largest category of `entry_type`, if any entries exist.
    pub fn top(&self, entry_type: EntryType) -> Option<&CategoryShare> {
        self.for_type(entry_type).first()
    }
}

pub fn category_breakdown<'a, I>(entries: I) -> CategoryBreakdown
where
    I: IntoIterator<Item = &'a FinancialEntry>,
{
    let entries: Vec<&FinancialEntry> = entries.into_iter().collect();
    CategoryBreakdown {
        expense: shares_for(&entries, EntryType::Expense),
        income: shares_for(&entries, EntryType::Income),
        investment: shares_for(&entries, EntryType::Investment),
    }
}

fn shares_for(entries: &[&FinancialEntry], entry_type: EntryType) -> Vec<CategoryShare> {
    // Vec + index map keeps first-seen order, so equal amounts stay in that order after the stable sort.
    let mut shares: Vec<CategoryShare> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries.iter().filter(|e| e.is(entry_type)) {
        let slot = *index.entry(entry.category.as_str()).or_insert_with(|| {
            shares.push(CategoryShare {
                category: entry.category.clone(),
                amount: Decimal::ZERO,
                percentage: Decimal::ZERO,
                entry_count: 0,
            });
            shares.len() - 1
        });
        shares[slot].amount = saturating_sum([shares[slot].amount, entry.amount]);
        shares[slot].entry_count += 1;
    }

    let total = saturating_sum(shares.iter().map(|s| s.amount));
    for share in &mut shares {
        share.percentage = ratio_pct(share.amount, total);
    }

    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use core_types::NewEntry;
    use rust_decimal_macros::dec;

    fn entry(entry_type: EntryType, category: &str, amount: Decimal) -> FinancialEntry {
        FinancialEntry::from_new(
            NewEntry {
                entry_type,
                category: category.into(),
                amount,
                date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                description: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn groups_sorts_and_computes_shares() {
        let entries = vec![
            entry(EntryType::Expense, "Food", dec!(100)),
            entry(EntryType::Expense, "Fuel", dec!(300)),
            entry(EntryType::Expense, "Food", dec!(100)),
            entry(EntryType::Income, "Salary", dec!(1000)),
        ];
        let breakdown = category_breakdown(&entries);

        let expense = breakdown.for_type(EntryType::Expense);
        assert_eq!(expense.len(), 2);
        assert_eq!(expense[0].category, "Fuel");
        assert_eq!(expense[0].percentage, dec!(60));
        assert_eq!(expense[1].amount, dec!(200));
        assert_eq!(expense[1].entry_count, 2);
        assert_eq!(breakdown.top(EntryType::Income).unwrap().percentage, dec!(100));
        assert!(breakdown.top(EntryType::Investment).is_none());
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let entries = vec![
            entry(EntryType::Investment, "Tools", dec!(50)),
            entry(EntryType::Investment, "Course", dec!(50)),
        ];
        let breakdown = category_breakdown(&entries);
        let names: Vec<&str> = breakdown.investment.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Tools", "Course"]);
    }

    #[test]
    fn zero_totals_give_zero_percentages() {
        let entries = vec![entry(EntryType::Expense, "Free sample", dec!(0))];
        assert_eq!(category_breakdown(&entries).expense[0].percentage, Decimal::ZERO);
    }
}
