use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::expenses::expense_table;
use crate::fmt::{money, percent};
use crate::models::Expense;
use crate::report::{category_breakdown, total_amount, Breakdown, CategoryDirectory};
use crate::window::{AnalysisWindow, WindowKind};

const BAR_WIDTH: usize = 20;

fn bar(pct: f64) -> String {
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn format_breakdown(breakdown: &Breakdown, symbol: &str) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%", ""]);
    for entry in &breakdown.entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(money(entry.amount, symbol)),
            Cell::new(percent(entry.percentage)),
            Cell::new(bar(entry.percentage)),
        ]);
    }
    table.to_string()
}

/// Plain-text analysis report: headline total, category breakdown (not for
/// category windows) and the history list.
pub fn render(
    window: &AnalysisWindow,
    expenses: &[Expense],
    categories: &CategoryDirectory,
    symbol: &str,
) -> String {
    let mut out = String::new();
    let kind = window.kind();
    out.push_str(&format!(
        "{} Report \u{2014} {}\n",
        kind.label(),
        window.label(categories)
    ));
    out.push_str(&format!(
        "Total spent: {}\n",
        money(total_amount(expenses), symbol).bold()
    ));

    if kind != WindowKind::Category {
        out.push_str("\nCategory Breakdown\n");
        let breakdown = category_breakdown(expenses, categories);
        if breakdown.entries.is_empty() {
            out.push_str("No data.\n");
        } else {
            out.push_str(&format_breakdown(&breakdown, symbol));
            out.push('\n');
        }
    }

    out.push_str(&format!("\nHistory ({})\n", expenses.len()));
    if !expenses.is_empty() {
        out.push_str(&expense_table(expenses, categories, symbol, false).to_string());
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::Category;

    fn expense(id: i64, amount: i64, category_id: i64) -> Expense {
        Expense {
            id,
            user_id: 1,
            amount,
            date: NaiveDate::from_ymd_opt(2025, 3, id as u32).unwrap(),
            memo: String::new(),
            category_id,
            category: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn dir() -> CategoryDirectory {
        CategoryDirectory::new(vec![
            Category { id: 1, name: "Food".into() },
            Category { id: 2, name: "Transport".into() },
        ])
    }

    #[test]
    fn test_month_report_has_breakdown_and_history() {
        let expenses = vec![expense(1, 1000, 1), expense(2, 500, 2), expense(3, 500, 1)];
        let out = render(&AnalysisWindow::Month { year: 2025, month: 3 }, &expenses, &dir(), "¥");
        assert!(out.starts_with("Monthly Report \u{2014} March 2025"));
        assert!(out.contains("2,000"));
        assert!(out.contains("Category Breakdown"));
        assert!(out.contains("75.0%"));
        assert!(out.contains("25.0%"));
        assert!(out.contains("History (3)"));
        let food = out.find("Food").unwrap();
        let transport = out.find("Transport").unwrap();
        assert!(food < transport, "largest category first");
    }

    #[test]
    fn test_category_report_omits_breakdown() {
        let expenses = vec![expense(1, 700, 1)];
        let out = render(&AnalysisWindow::Category(Some(1)), &expenses, &dir(), "¥");
        assert!(out.starts_with("Category Report \u{2014} Food"));
        assert!(!out.contains("Category Breakdown"));
        assert!(out.contains("History (1)"));
    }

    #[test]
    fn test_empty_window() {
        let out = render(&AnalysisWindow::Year(2020), &[], &dir(), "¥");
        assert!(out.contains("No data."));
        assert!(out.contains("History (0)"));
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0.0).chars().filter(|&c| c == '█').count(), 0);
        assert_eq!(bar(50.0).chars().filter(|&c| c == '█').count(), 10);
        assert_eq!(bar(100.0).chars().filter(|&c| c == '█').count(), 20);
        assert_eq!(bar(100.0).chars().count(), 20);
    }
}
