use std::collections::HashMap;

use crate::models::{Category, CategoryId, Expense};

/// Label for a category id that is not in the directory.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Display colors, picked by `category_id mod PALETTE.len()`. Two categories
/// may share a color.
pub const PALETTE: [&str; 8] = [
    "#4F46E5", "#EC4899", "#10B981", "#F59E0B",
    "#8B5CF6", "#EF4444", "#3B82F6", "#6366F1",
];

pub fn color_for(category_id: CategoryId) -> &'static str {
    PALETTE[category_id.rem_euclid(PALETTE.len() as i64) as usize]
}

// ---------------------------------------------------------------------------
// Category directory
// ---------------------------------------------------------------------------

/// Categories by id, in the order the backend returned them.
#[derive(Debug, Clone, Default)]
pub struct CategoryDirectory {
    categories: Vec<Category>,
    by_id: HashMap<CategoryId, usize>,
}

impl CategoryDirectory {
    pub fn new(categories: Vec<Category>) -> Self {
        let by_id = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        Self { categories, by_id }
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.by_id.get(&id).map(|&i| &self.categories[i])
    }

    pub fn name(&self, id: CategoryId) -> &str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Name for a record: its embedded category (unless blank), then the
    /// directory, then [`UNKNOWN_CATEGORY`].
    pub fn name_for<'a>(&'a self, embedded: Option<&'a Category>, id: CategoryId) -> &'a str {
        match embedded {
            Some(c) if !c.name.trim().is_empty() => c.name.as_str(),
            _ => self.name(id),
        }
    }

    /// Resolve a user-typed category: numeric id first, then a
    /// case-insensitive name match.
    pub fn find(&self, key: &str) -> Option<&Category> {
        if let Ok(id) = key.trim().parse::<CategoryId>() {
            if let Some(c) = self.get(id) {
                return Some(c);
            }
        }
        let key = key.trim();
        self.categories.iter().find(|c| c.name.eq_ignore_ascii_case(key))
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownEntry {
    pub category_id: CategoryId,
    pub name: String,
    pub amount: i64,
    pub percentage: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub entries: Vec<BreakdownEntry>,
    pub total: i64,
}

/// Sum of all amounts, saturating at the `i64` bounds.
pub fn total_amount(expenses: &[Expense]) -> i64 {
    expenses.iter().fold(0i64, |acc, e| acc.saturating_add(e.amount))
}

/// Group `expenses` by category and compute each group's share of the total,
/// largest first. Pure: the result depends only on the two inputs.
pub fn category_breakdown(expenses: &[Expense], categories: &CategoryDirectory) -> Breakdown {
    let mut sums: HashMap<CategoryId, i64> = HashMap::new();
    for e in expenses {
        let sum = sums.entry(e.category_id).or_insert(0);
        *sum = sum.saturating_add(e.amount);
    }

    let total = sums.values().fold(0i64, |acc, &v| acc.saturating_add(v));

    let mut entries: Vec<BreakdownEntry> = sums
        .into_iter()
        .map(|(category_id, amount)| BreakdownEntry {
            category_id,
            name: categories.name(category_id).to_string(),
            amount,
            percentage: if total > 0 {
                amount as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            color: color_for(category_id),
        })
        .collect();
    entries.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then(a.category_id.cmp(&b.category_id))
    });

    Breakdown { entries, total }
}

// ---------------------------------------------------------------------------
// Dashboard summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_expenses: i64,
    pub expense_count: usize,
    pub subscription_count: usize,
    pub category_count: usize,
}

pub fn dashboard_summary(
    expenses: &[Expense],
    subscription_count: usize,
    categories: &CategoryDirectory,
) -> DashboardSummary {
    DashboardSummary {
        total_expenses: total_amount(expenses),
        expense_count: expenses.len(),
        subscription_count,
        category_count: categories.len(),
    }
}
