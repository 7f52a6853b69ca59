mod api;
mod cli;
mod error;
mod fmt;
mod models;
mod report;
mod session;
mod settings;
#[cfg(test)]
mod testutil;
mod tui;
mod window;

use clap::Parser;
use colored::Colorize;

use cli::{
    CategoriesCommands, Cli, Commands, ConfigCommands, Context, ExpensesCommands,
    SubscriptionsCommands, UsersCommands, UtilitiesCommands,
};
use error::Result;
use models::NewUser;

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {e}").red());
        std::process::exit(1);
    }
}

/// Effective settings with the `--api-url` flag applied last.
fn connect(api_url: Option<String>) -> Result<Context> {
    let mut settings = settings::effective_settings();
    if let Some(url) = api_url {
        settings.api_url = url;
    }
    log::debug!("using backend at {}", settings.api_url);
    Context::new(settings)
}

fn run(cli: Cli) -> Result<()> {
    let api_url = cli.api_url;
    match cli.command.unwrap_or(Commands::Summary) {
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Set {
                api_url,
                user_id,
                currency,
            } => cli::config::set(api_url, user_id, currency),
        },
        Commands::Summary => cli::summary::run(&connect(api_url)?),
        Commands::Report(args) => cli::report::dispatch(&connect(api_url)?, &args),
        Commands::Expenses { command } => {
            let ctx = connect(api_url)?;
            match command {
                ExpensesCommands::List => cli::expenses::list(&ctx),
                ExpensesCommands::Add(fields) => cli::expenses::add(&ctx, &fields),
                ExpensesCommands::Update { id, fields } => {
                    cli::expenses::update(&ctx, id, &fields)
                }
                ExpensesCommands::Delete { id } => cli::expenses::delete(&ctx, id),
            }
        }
        Commands::Categories { command } => {
            let ctx = connect(api_url)?;
            match command {
                CategoriesCommands::List => cli::categories::list(&ctx),
                CategoriesCommands::Add { name } => cli::categories::add(&ctx, &name),
                CategoriesCommands::Rename { id, name } => {
                    cli::categories::rename(&ctx, id, &name)
                }
                CategoriesCommands::Delete { id } => cli::categories::delete(&ctx, id),
            }
        }
        Commands::Subscriptions { command } => {
            let ctx = connect(api_url)?;
            match command {
                SubscriptionsCommands::List => cli::subscriptions::list(&ctx),
                SubscriptionsCommands::Add(fields) => cli::subscriptions::add(&ctx, &fields),
                SubscriptionsCommands::Update { id, fields } => {
                    cli::subscriptions::update(&ctx, id, &fields)
                }
                SubscriptionsCommands::Delete { id } => cli::subscriptions::delete(&ctx, id),
            }
        }
        Commands::Users { command } => {
            let ctx = connect(api_url)?;
            match command {
                UsersCommands::List => cli::users::list(&ctx),
                UsersCommands::Add {
                    name,
                    email,
                    real_name,
                    icon,
                    memo,
                } => cli::users::add(
                    &ctx,
                    NewUser {
                        name,
                        real_name,
                        email,
                        icon,
                        profile_memo: memo,
                    },
                ),
            }
        }
        Commands::Utilities { command } => {
            let ctx = connect(api_url)?;
            match command {
                UtilitiesCommands::List { user, category } => {
                    cli::utilities::list(&ctx, user, category.as_deref())
                }
                UtilitiesCommands::Add(fields) => cli::utilities::add(&ctx, &fields),
                UtilitiesCommands::Update {
                    id,
                    amount,
                    date,
                    category,
                    memo,
                    user,
                } => cli::utilities::update(
                    &ctx,
                    id,
                    cli::utilities::UtilityUpdate {
                        amount,
                        date,
                        category,
                        memo,
                        user,
                    },
                ),
                UtilitiesCommands::Delete { id } => cli::utilities::delete(&ctx, id),
            }
        }
    }
}
