use comfy_table::{Cell, Table};

use crate::cli::{parse_date, write_failed, Context, ExpenseFields};
use crate::error::{KakeiboError, Result};
use crate::fmt::money;
use crate::models::{NewPublicUtility, PublicUtilityPatch, UtilityFilter};

pub fn list(ctx: &Context, user: Option<i64>, category: Option<&str>) -> Result<()> {
    let dir = ctx.categories()?;
    let category_id = match category {
        Some(key) => Some(
            dir.find(key)
                .map(|c| c.id)
                .ok_or_else(|| KakeiboError::InvalidArgument(format!("unknown category: {key}")))?,
        ),
        None => None,
    };
    let bills = ctx
        .client
        .get_public_utilities(UtilityFilter { user_id: user, category_id })?;

    if bills.is_empty() {
        println!("No public utility bills found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Category", "Amount", "Memo"]);
    for b in &bills {
        table.add_row(vec![
            Cell::new(b.id),
            Cell::new(b.date.format("%Y-%m-%d")),
            Cell::new(dir.name_for(b.category.as_ref(), b.category_id)),
            Cell::new(money(b.amount, ctx.symbol())),
            Cell::new(&b.memo),
        ]);
    }
    println!("Public Utilities\n{table}");
    Ok(())
}

pub fn add(ctx: &Context, fields: &ExpenseFields) -> Result<()> {
    let body = NewPublicUtility {
        user_id: fields.user.unwrap_or(ctx.settings.user_id),
        amount: fields.amount,
        date: parse_date(&fields.date)?,
        category_id: ctx.resolve_category(&fields.category)?,
        memo: fields.memo.clone(),
    };
    let created = ctx
        .client
        .create_public_utility(&body)
        .map_err(|e| write_failed("add public utility", e))?;
    println!(
        "Added public utility #{}: {} on {}",
        created.id,
        money(created.amount, ctx.symbol()),
        created.date
    );
    Ok(())
}

pub struct UtilityUpdate {
    pub amount: Option<i64>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub memo: Option<String>,
    pub user: Option<i64>,
}

pub fn update(ctx: &Context, id: i64, changes: UtilityUpdate) -> Result<()> {
    let patch = PublicUtilityPatch {
        user_id: changes.user,
        amount: changes.amount,
        date: changes.date.as_deref().map(parse_date).transpose()?,
        category_id: changes
            .category
            .as_deref()
            .map(|key| ctx.resolve_category(key))
            .transpose()?,
        memo: changes.memo,
    };
    if patch.is_empty() {
        return Err(KakeiboError::InvalidArgument(
            "nothing to update (pass at least one of --amount, --date, --category, --memo, --user)"
                .into(),
        ));
    }
    let updated = ctx
        .client
        .update_public_utility(id, &patch)
        .map_err(|e| write_failed("update public utility", e))?;
    println!(
        "Updated public utility #{}: {} on {}",
        updated.id,
        money(updated.amount, ctx.symbol()),
        updated.date
    );
    Ok(())
}

pub fn delete(ctx: &Context, id: i64) -> Result<()> {
    ctx.client
        .delete_public_utility(id)
        .map_err(|e| write_failed("delete public utility", e))?;
    println!("Deleted public utility #{id}");
    Ok(())
}
