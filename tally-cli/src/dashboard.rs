//! Plain-text rendering of summaries and transaction tables.

use std::io::{self, Write};
use tally_core::{SpendingSummary, Transaction};

const BAR_WIDTH: f64 = 30.0;

pub fn render_summary(out: &mut impl Write, summary: &SpendingSummary) -> io::Result<()> {
    if summary.is_empty() {
        writeln!(out, "No transactions yet. Add one first.")?;
        return Ok(());
    }

    writeln!(out, "Total spent:        {:>10.2}", summary.total)?;
    writeln!(out, "Average expense:    {:>10.2}", summary.average)?;
    writeln!(out, "Transactions:       {:>10}", summary.count)?;
    if let Some(top) = summary.top_category() {
        writeln!(out, "Top category:       {:>10}", top)?;
    }

    writeln!(out, "\nBy category")?;
    let max = summary
        .by_category
        .iter()
        .map(|(_, amount)| *amount)
        .fold(0.0, f64::max);
    for (category, amount) in &summary.by_category {
        writeln!(out, "  {:<14}{:>10.2}  {}", category.name(), amount, bar(*amount, max))?;
    }

    writeln!(out, "\nBy day")?;
    let max = summary.by_day.iter().map(|(_, amount)| *amount).fold(0.0, f64::max);
    for (date, amount) in &summary.by_day {
        writeln!(out, "  {}    {:>10.2}  {}", date, amount, bar(*amount, max))?;
    }
    Ok(())
}

pub fn render_table<'a>(
    out: &mut impl Write,
    txns: impl IntoIterator<Item = &'a Transaction>,
) -> io::Result<()> {
    writeln!(
        out,
        "{:>4}  {:<10}  {:<32}  {:>10}  {}",
        "id", "date", "description", "amount", "category"
    )?;
    let mut any = false;
    for t in txns {
        any = true;
        writeln!(
            out,
            "{:>4}  {}  {:<32}  {:>10.2}  {}",
            t.id,
            t.date,
            truncate(&t.description, 32),
            t.amount,
            t.category
        )?;
    }
    if !any {
        writeln!(out, "  (no transactions)")?;
    }
    Ok(())
}

fn bar(amount: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let n = ((amount / max) * BAR_WIDTH).round() as usize;
    "#".repeat(n)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(width - 1).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_core::{Category, TransactionId};

    fn txn(id: u64, desc: &str, amount: f64, category: Category) -> Transaction {
        Transaction {
            id: TransactionId(id),
            date: NaiveDate::from_ymd_opt(2024, 11, 13).unwrap(),
            description: desc.to_string(),
            amount,
            category,
        }
    }

    #[test]
    fn test_summary_lists_categories() {
        let txns = vec![
            txn(1, "Biedronka", 150.5, Category::Food),
            txn(2, "Orlen", 200.0, Category::Transport),
        ];
        let mut out = Vec::new();
        render_summary(&mut out, &SpendingSummary::from_transactions(&txns)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("350.50"), "{text}");
        assert!(text.contains("Food"));
        assert!(text.contains("Transport"));
        assert!(text.contains("2024-11-13"));
        assert!(text.contains("Top category:        Transport"), "{text}");
    }

    #[test]
    fn test_empty_summary_message() {
        let mut out = Vec::new();
        render_summary(&mut out, &SpendingSummary::default()).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No transactions"));
    }

    #[test]
    fn test_table_truncates_long_descriptions() {
        let long = "x".repeat(40);
        let txns = vec![txn(7, &long, 1.0, Category::Other)];
        let mut out = Vec::new();
        render_table(&mut out, &txns).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('…'));
        assert!(!text.contains(&long));
    }

    #[test]
    fn test_bar_scales_to_max() {
        assert_eq!(bar(10.0, 10.0).len(), 30);
        assert_eq!(bar(5.0, 10.0).len(), 15);
        assert_eq!(bar(1.0, 0.0), "");
    }
}
