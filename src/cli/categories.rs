use comfy_table::{Cell, Table};

use crate::cli::{write_failed, Context};
use crate::error::{KakeiboError, Result};
use crate::models::CategoryId;
use crate::report::color_for;

pub fn list(ctx: &Context) -> Result<()> {
    let dir = ctx.categories()?;
    if dir.is_empty() {
        println!("No categories yet. Add one with `kakeibo categories add <name>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Color"]);
    for cat in dir.as_slice() {
        table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(&cat.name),
            Cell::new(color_for(cat.id)),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}

fn check_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(KakeiboError::InvalidArgument("Name is required".into()));
    }
    Ok(name)
}

pub fn add(ctx: &Context, name: &str) -> Result<()> {
    let name = check_name(name)?;
    let created = ctx
        .client
        .create_category(name)
        .map_err(|e| write_failed("add category", e))?;
    println!("Added category #{}: {}", created.id, created.name);
    Ok(())
}

pub fn rename(ctx: &Context, id: CategoryId, name: &str) -> Result<()> {
    let name = check_name(name)?;
    ctx.client
        .rename_category(id, name)
        .map_err(|e| write_failed("rename category", e))?;
    println!("Renamed category #{id} to: {name}");
    Ok(())
}

pub fn delete(ctx: &Context, id: CategoryId) -> Result<()> {
    ctx.client
        .delete_category(id)
        .map_err(|e| write_failed("delete category", e))?;
    println!("Deleted category #{id}");
    Ok(())
}
