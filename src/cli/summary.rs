use crate::cli::Context;
use crate::error::Result;
use crate::fmt::money;
use crate::report::{dashboard_summary, DashboardSummary};

/// Each figure is fetched on its own; a failed fetch is logged and counts as
/// empty so the other figures still show.
pub fn run(ctx: &Context) -> Result<()> {
    let expenses = or_empty("expenses", ctx.client.get_expenses());
    let subscriptions = or_empty("subscriptions", ctx.client.get_subscriptions());
    let categories = or_empty("categories", ctx.categories());

    let summary = dashboard_summary(&expenses, subscriptions.len(), &categories);
    println!("{}", format_summary(&summary, ctx.symbol()));
    Ok(())
}

fn or_empty<T: Default>(what: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        log::warn!("failed to load {what}: {e}");
        T::default()
    })
}

fn format_summary(s: &DashboardSummary, symbol: &str) -> String {
    format!(
        "Total spent:    {} ({} expenses, all time)\nSubscriptions:  {}\nCategories:     {}",
        money(s.total_expenses, symbol),
        s.expense_count,
        s.subscription_count,
        s.category_count
    )
}
