use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{parse_date, write_failed, Context, ExpenseFields};
use crate::error::Result;
use crate::fmt::money;
use crate::models::{Expense, NewExpense};
use crate::report::{total_amount, CategoryDirectory};

pub fn list(ctx: &Context) -> Result<()> {
    let expenses = ctx.client.get_expenses()?;
    let dir = ctx.categories()?;

    if expenses.is_empty() {
        println!("No expenses yet.");
        return Ok(());
    }
    let table = expense_table(&expenses, &dir, ctx.symbol(), true);
    println!(
        "Expenses ({}, total {})\n{table}",
        expenses.len(),
        money(total_amount(&expenses), ctx.symbol())
    );
    Ok(())
}

pub fn add(ctx: &Context, fields: &ExpenseFields) -> Result<()> {
    let body = new_expense(ctx, fields)?;
    let created = ctx
        .client
        .create_expense(&body)
        .map_err(|e| write_failed("add expense", e))?;
    println!(
        "Added expense #{}: {} on {}",
        created.id,
        money(created.amount, ctx.symbol()),
        created.date
    );
    Ok(())
}

pub fn update(ctx: &Context, id: i64, fields: &ExpenseFields) -> Result<()> {
    let body = new_expense(ctx, fields)?;
    ctx.client
        .update_expense(id, &body)
        .map_err(|e| write_failed("update expense", e))?;
    println!("Updated expense #{id}");
    Ok(())
}

pub fn delete(ctx: &Context, id: i64) -> Result<()> {
    ctx.client
        .delete_expense(id)
        .map_err(|e| write_failed("delete expense", e))?;
    println!("Deleted expense #{id}");
    Ok(())
}

fn new_expense(ctx: &Context, fields: &ExpenseFields) -> Result<NewExpense> {
    Ok(NewExpense {
        user_id: fields.user.unwrap_or(ctx.settings.user_id),
        amount: fields.amount,
        date: parse_date(&fields.date)?,
        category_id: ctx.resolve_category(&fields.category)?,
        memo: fields.memo.clone(),
    })
}

/// Date / category / amount rows, optionally with id and memo columns.
pub(crate) fn expense_table(
    expenses: &[Expense],
    dir: &CategoryDirectory,
    symbol: &str,
    detailed: bool,
) -> Table {
    let mut table = Table::new();
    if detailed {
        table.set_header(vec!["ID", "Date", "Category", "Amount", "Memo"]);
    } else {
        table.set_header(vec!["Date", "Category", "Amount"]);
    }
    for e in expenses {
        let name = dir.name_for(e.category.as_ref(), e.category_id);
        let date = e.date.format("%Y-%m-%d").to_string();
        let amount = money(e.amount, symbol);
        if detailed {
            table.add_row(vec![
                Cell::new(e.id),
                Cell::new(date),
                Cell::new(name),
                Cell::new(amount),
                Cell::new(&e.memo),
            ]);
        } else {
            table.add_row(vec![Cell::new(date), Cell::new(name), Cell::new(amount)]);
        }
    }
    if detailed {
        table.add_row(vec![
            Cell::new(""),
            Cell::new("Total".bold()),
            Cell::new(""),
            Cell::new(money(total_amount(expenses), symbol)),
            Cell::new(""),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::Category;

    #[test]
    fn test_expense_table_resolves_names() {
        let dir = CategoryDirectory::new(vec![Category { id: 1, name: "Food".into() }]);
        let mk = |id, category_id, category: Option<Category>| Expense {
            id,
            user_id: 1,
            amount: 1500,
            date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            memo: "memo".into(),
            category_id,
            category,
            created_at: None,
            updated_at: None,
        };
        let expenses = vec![
            mk(1, 1, None),
            mk(2, 5, None),
            mk(3, 6, Some(Category { id: 6, name: "Books".into() })),
        ];
        let out = expense_table(&expenses, &dir, "¥", false).to_string();
        assert!(out.contains("Food"));
        assert!(out.contains("unknown"));
        assert!(out.contains("Books"));
        assert!(out.contains("¥1,500"));
        assert!(out.contains("2025-04-02"));
    }
}
