use comfy_table::{Cell, Table};

use crate::cli::{write_failed, Context};
use crate::error::Result;
use crate::models::NewUser;

pub fn list(ctx: &Context) -> Result<()> {
    let users = ctx.client.get_users()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Real Name", "Email"]);
    for u in users {
        table.add_row(vec![
            Cell::new(u.id),
            Cell::new(u.name),
            Cell::new(u.real_name),
            Cell::new(u.email),
        ]);
    }
    println!("Users\n{table}");
    Ok(())
}

pub fn add(ctx: &Context, user: NewUser) -> Result<()> {
    let created = ctx
        .client
        .create_user(&user)
        .map_err(|e| write_failed("add user", e))?;
    println!("Added user #{}: {}", created.id, created.name);
    Ok(())
}
