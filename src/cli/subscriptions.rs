use comfy_table::{Cell, Table};

use crate::cli::{write_failed, Context, SubscriptionFields};
use crate::error::{KakeiboError, Result};
use crate::fmt::money;
use crate::models::{Frequency, NewSubscription, Subscription};
use crate::report::CategoryDirectory;

pub fn list(ctx: &Context) -> Result<()> {
    let subs = ctx.client.get_subscriptions()?;
    if subs.is_empty() {
        println!("No subscriptions yet.");
        return Ok(());
    }
    let dir = ctx.categories()?;
    println!("Subscriptions\n{}", format_subscriptions(&subs, &dir, ctx.symbol()));
    Ok(())
}

pub(crate) fn format_subscriptions(
    subs: &[Subscription],
    dir: &CategoryDirectory,
    symbol: &str,
) -> String {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Product", "Frequency", "Amount", "Category"]);
    for s in subs {
        table.add_row(vec![
            Cell::new(s.id),
            Cell::new(&s.product_name),
            Cell::new(&s.frequency),
            Cell::new(money(s.amount, symbol)),
            Cell::new(dir.name_for(s.category.as_ref(), s.category_id)),
        ]);
    }
    table.to_string()
}

fn new_subscription(ctx: &Context, fields: &SubscriptionFields) -> Result<NewSubscription> {
    let product_name = fields.product_name.trim();
    if product_name.is_empty() {
        return Err(KakeiboError::InvalidArgument("Product name is required".into()));
    }
    let frequency: Frequency = fields
        .frequency
        .parse()
        .map_err(KakeiboError::InvalidArgument)?;
    Ok(NewSubscription {
        user_id: fields.user.unwrap_or(ctx.settings.user_id),
        product_name: product_name.to_string(),
        category_id: ctx.resolve_category(&fields.category)?,
        frequency,
    })
}

pub fn add(ctx: &Context, fields: &SubscriptionFields) -> Result<()> {
    let body = new_subscription(ctx, fields)?;
    let created = ctx
        .client
        .create_subscription(&body)
        .map_err(|e| write_failed("add subscription", e))?;
    println!(
        "Added subscription #{}: {} ({})",
        created.id,
        created.product_name,
        created.frequency
    );
    Ok(())
}

pub fn update(ctx: &Context, id: i64, fields: &SubscriptionFields) -> Result<()> {
    let body = new_subscription(ctx, fields)?;
    ctx.client
        .update_subscription(id, &body)
        .map_err(|e| write_failed("update subscription", e))?;
    println!("Updated subscription #{id}");
    Ok(())
}

pub fn delete(ctx: &Context, id: i64) -> Result<()> {
    ctx.client
        .delete_subscription(id)
        .map_err(|e| write_failed("delete subscription", e))?;
    println!("Deleted subscription #{id}");
    Ok(())
}
