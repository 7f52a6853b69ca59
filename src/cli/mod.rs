pub mod categories;
pub mod config;
pub mod expenses;
pub mod report;
pub mod subscriptions;
pub mod summary;
pub mod users;
pub mod utilities;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::api::ApiClient;
use crate::error::{KakeiboError, Result};
use crate::models::CategoryId;
use crate::report::CategoryDirectory;
use crate::settings::Settings;

/// Everything a command needs: the effective settings and a client built
/// from them. Passed explicitly; there is no global state.
pub struct Context {
    pub settings: Settings,
    pub client: ApiClient,
}

impl Context {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = ApiClient::from_settings(&settings)?;
        Ok(Self { settings, client })
    }

    pub fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }

    pub fn categories(&self) -> Result<CategoryDirectory> {
        Ok(CategoryDirectory::new(self.client.get_categories()?))
    }

    /// Resolve a category given as an id or a name against the backend's list.
    pub fn resolve_category(&self, key: &str) -> Result<CategoryId> {
        let dir = self.categories()?;
        dir.find(key)
            .map(|c| c.id)
            .ok_or_else(|| KakeiboError::InvalidArgument(format!("unknown category: {key}")))
    }
}

/// Wrap a failed backend write so the user sees what did not happen. Nothing
/// is retried; re-running the same command resubmits it.
pub(crate) fn write_failed(action: &str, e: KakeiboError) -> KakeiboError {
    KakeiboError::Other(format!("Failed to {action}: {e}"))
}

/// Parse `YYYY-MM-DD`, or `today`.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(chrono::Local::now().date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| KakeiboError::InvalidDate(format!("{raw} (expected YYYY-MM-DD)")))
}

/// Parse `YYYY-MM` into (year, month).
pub(crate) fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let bad = || KakeiboError::InvalidDate(format!("{raw} (expected YYYY-MM)"));
    let (y, m) = raw.split_once('-').ok_or_else(bad)?;
    let year = y.parse().map_err(|_| bad())?;
    let month: u32 = m.parse().map_err(|_| bad())?;
    if !(1..=12).contains(&month) {
        return Err(bad());
    }
    Ok((year, month))
}

#[derive(Parser)]
#[command(name = "kakeibo", about = "Household expense tracker for a kakeibo backend.")]
pub struct Cli {
    /// Backend base URL (overrides KAKEIBO_API_URL and the settings file)
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record and list expenses.
    Expenses {
        #[command(subcommand)]
        command: ExpensesCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Manage subscriptions.
    Subscriptions {
        #[command(subcommand)]
        command: SubscriptionsCommands,
    },
    /// Manage users.
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Manage public utility bills.
    Utilities {
        #[command(subcommand)]
        command: UtilitiesCommands,
    },
    /// Analysis report for a day, week, month, year or category.
    Report(ReportArgs),
    /// All-time totals: expenses, subscriptions, categories.
    Summary,
    /// Show or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Clone)]
pub struct ExpenseFields {
    /// Amount in whole currency units
    #[arg(long)]
    pub amount: i64,
    /// Date: YYYY-MM-DD or 'today'
    #[arg(long, default_value = "today")]
    pub date: String,
    /// Category id or name
    #[arg(long)]
    pub category: String,
    /// Free-text memo
    #[arg(long, default_value = "")]
    pub memo: String,
    /// Owning user id (default: settings user_id)
    #[arg(long)]
    pub user: Option<i64>,
}

#[derive(Subcommand)]
pub enum ExpensesCommands {
    /// List every expense.
    List,
    /// Record an expense.
    Add(ExpenseFields),
    /// Replace an expense's fields.
    Update {
        /// Expense ID
        id: i64,
        #[command(flatten)]
        fields: ExpenseFields,
    },
    /// Delete an expense.
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List categories.
    List,
    /// Add a category.
    Add {
        /// Category name
        name: String,
    },
    /// Rename a category.
    Rename {
        /// Category ID
        id: CategoryId,
        /// New name
        name: String,
    },
    /// Delete a category.
    Delete {
        /// Category ID
        id: CategoryId,
    },
}

#[derive(Args, Clone)]
pub struct SubscriptionFields {
    /// Product name, e.g. 'Netflix'
    #[arg(long = "name")]
    pub product_name: String,
    /// Category id or name
    #[arg(long)]
    pub category: String,
    /// Billing frequency: monthly or yearly
    #[arg(long, default_value = "monthly")]
    pub frequency: String,
    /// Owning user id (default: settings user_id)
    #[arg(long)]
    pub user: Option<i64>,
}

#[derive(Subcommand)]
pub enum SubscriptionsCommands {
    /// List subscriptions.
    List,
    /// Add a subscription.
    Add(SubscriptionFields),
    /// Replace a subscription's fields.
    Update {
        /// Subscription ID
        id: i64,
        #[command(flatten)]
        fields: SubscriptionFields,
    },
    /// Delete a subscription.
    Delete {
        /// Subscription ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List users.
    List,
    /// Add a user.
    Add {
        /// Display name
        name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Real name
        #[arg(long = "real-name", default_value = "")]
        real_name: String,
        /// Icon URL
        #[arg(long)]
        icon: Option<String>,
        /// Profile memo
        #[arg(long)]
        memo: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UtilitiesCommands {
    /// List public utility bills.
    List {
        /// Only this user's bills
        #[arg(long)]
        user: Option<i64>,
        /// Only bills in this category (id or name)
        #[arg(long)]
        category: Option<String>,
    },
    /// Record a bill.
    Add(ExpenseFields),
    /// Change some fields of a bill.
    Update {
        /// Bill ID
        id: i64,
        #[arg(long)]
        amount: Option<i64>,
        /// Date: YYYY-MM-DD or 'today'
        #[arg(long)]
        date: Option<String>,
        /// Category id or name
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        memo: Option<String>,
        #[arg(long)]
        user: Option<i64>,
    },
    /// Delete a bill.
    Delete {
        /// Bill ID
        id: i64,
    },
}

#[derive(Args, Clone, Default)]
#[group(id = "window", multiple = false)]
pub struct WindowArgs {
    /// One day: YYYY-MM-DD or 'today'
    #[arg(long)]
    pub day: Option<String>,
    /// The Monday-to-Sunday week containing this date
    #[arg(long)]
    pub week: Option<String>,
    /// One month: YYYY-MM (default: this month)
    #[arg(long)]
    pub month: Option<String>,
    /// One calendar year
    #[arg(long)]
    pub year: Option<i32>,
    /// One category (id or name); without a value nothing is selected
    #[arg(long, num_args = 0..=1)]
    pub category: Option<Option<String>>,
}

#[derive(Args, Clone, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub window: WindowArgs,
    /// Print plain text even on a terminal
    #[arg(long)]
    pub text: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings and where they come from.
    Show,
    /// Update stored settings.
    Set {
        /// Backend base URL to store
        #[arg(long = "url")]
        api_url: Option<String>,
        #[arg(long = "user-id")]
        user_id: Option<i64>,
        #[arg(long)]
        currency: Option<String>,
    },
}
