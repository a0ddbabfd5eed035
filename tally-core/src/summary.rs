//! Spending aggregates for the dashboard: totals, per-category sums and a
//! daily series.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::category::Category;
use crate::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpendingSummary {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    /// Categories with at least one transaction, in [`Category::ALL`] order
    pub by_category: Vec<(Category, f64)>,
    /// Daily totals, oldest first
    pub by_day: Vec<(NaiveDate, f64)>,
}

impl SpendingSummary {
    pub fn from_transactions<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut count = 0;
        let mut total = 0.0;
        let mut categories: BTreeMap<Category, f64> = BTreeMap::new();
        let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for t in txns {
            count += 1;
            total += t.amount;
            *categories.entry(t.category).or_insert(0.0) += t.amount;
            *days.entry(t.date).or_insert(0.0) += t.amount;
        }

        let average = if count == 0 { 0.0 } else { total / count as f64 };

        // BTreeMap over Category iterates in declaration order
        Self {
            count,
            total,
            average,
            by_category: categories.into_iter().collect(),
            by_day: days.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Category with the largest total, if any.
    pub fn top_category(&self) -> Option<Category> {
        self.by_category
            .iter()
            .fold(None::<(Category, f64)>, |best, &(c, amount)| match best {
                Some((_, top)) if top >= amount => best,
                _ => Some((c, amount)),
            })
            .map(|(c, _)| c)
    }
}
