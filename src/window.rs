use chrono::{Datelike, Duration, NaiveDate};

use crate::api::ExpenseSource;
use crate::error::{KakeiboError, Result};
use crate::models::{Category, CategoryId, Expense};
use crate::report::CategoryDirectory;

const MONTH_NAMES: &[&str] = &[
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Day,
    Week,
    Month,
    Year,
    Category,
}

impl WindowKind {
    pub fn label(self) -> &'static str {
        match self {
            WindowKind::Day => "Daily",
            WindowKind::Week => "Weekly",
            WindowKind::Month => "Monthly",
            WindowKind::Year => "Yearly",
            WindowKind::Category => "Category",
        }
    }
}

/// The active analysis filter. `Week` always holds a Monday; build it with
/// [`AnalysisWindow::week_containing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisWindow {
    Day(NaiveDate),
    Week(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
    Category(Option<CategoryId>),
}

/// Concrete backend request for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowQuery {
    Day(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
    Month { year: i32, month: u32 },
    Year(i32),
    Category(CategoryId),
    /// No category selected: nothing to ask the backend for.
    Nothing,
}

/// Monday on or before `date` (ISO weeks start on Monday).
pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn week_end(start: NaiveDate) -> NaiveDate {
    start + Duration::days(6)
}

fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(KakeiboError::InvalidArgument(format!(
            "month must be between 1 and 12, got {month}"
        )))
    }
}

fn add_months(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let mut m = month as i32 + delta;
    let mut y = year;
    while m < 1 {
        m += 12;
        y -= 1;
    }
    while m > 12 {
        m -= 12;
        y += 1;
    }
    (y, m as u32)
}

impl AnalysisWindow {
    pub fn week_containing(date: NaiveDate) -> Self {
        AnalysisWindow::Week(monday_on_or_before(date))
    }

    pub fn month(year: i32, month: u32) -> Result<Self> {
        check_month(month)?;
        Ok(AnalysisWindow::Month { year, month })
    }

    pub fn kind(&self) -> WindowKind {
        match self {
            AnalysisWindow::Day(_) => WindowKind::Day,
            AnalysisWindow::Week(_) => WindowKind::Week,
            AnalysisWindow::Month { .. } => WindowKind::Month,
            AnalysisWindow::Year(_) => WindowKind::Year,
            AnalysisWindow::Category(_) => WindowKind::Category,
        }
    }

    pub fn query(&self) -> WindowQuery {
        match *self {
            AnalysisWindow::Day(date) => WindowQuery::Day(date),
            AnalysisWindow::Week(start) => {
                let start = monday_on_or_before(start);
                WindowQuery::Range { start, end: week_end(start) }
            }
            AnalysisWindow::Month { year, month } => WindowQuery::Month { year, month },
            AnalysisWindow::Year(year) => WindowQuery::Year(year),
            AnalysisWindow::Category(Some(id)) => WindowQuery::Category(id),
            AnalysisWindow::Category(None) => WindowQuery::Nothing,
        }
    }

    pub fn label(&self, categories: &CategoryDirectory) -> String {
        match *self {
            AnalysisWindow::Day(date) => date.format("%Y-%m-%d (%a)").to_string(),
            AnalysisWindow::Week(start) => {
                let start = monday_on_or_before(start);
                format!(
                    "Week of {} \u{2013} {}",
                    start.format("%Y-%m-%d"),
                    week_end(start).format("%Y-%m-%d")
                )
            }
            AnalysisWindow::Month { year, month } => {
                let name = MONTH_NAMES.get((month as usize).wrapping_sub(1)).unwrap_or(&"???");
                format!("{name} {year}")
            }
            AnalysisWindow::Year(year) => format!("{year}"),
            AnalysisWindow::Category(Some(id)) => categories.name(id).to_string(),
            AnalysisWindow::Category(None) => "(no category selected)".to_string(),
        }
    }
}

/// Fetch the expenses for `window`, propagating backend failures.
pub fn try_fetch_window(
    source: &(impl ExpenseSource + ?Sized),
    window: &AnalysisWindow,
) -> Result<Vec<Expense>> {
    match window.query() {
        WindowQuery::Day(date) => source.expenses_by_day(date),
        WindowQuery::Range { start, end } => source.expenses_by_week(start, end),
        WindowQuery::Month { year, month } => {
            check_month(month)?;
            source.expenses_by_month(year, month)
        }
        WindowQuery::Year(year) => source.expenses_by_year(year),
        WindowQuery::Category(id) => source.expenses_by_category(id),
        WindowQuery::Nothing => Ok(Vec::new()),
    }
}

/// Fetch the expenses for `window`. A failed fetch is logged and yields an
/// empty set, never data from an earlier window.
pub fn fetch_window(
    source: &(impl ExpenseSource + ?Sized),
    window: &AnalysisWindow,
) -> Vec<Expense> {
    match try_fetch_window(source, window) {
        Ok(expenses) => expenses,
        Err(e) => {
            log::warn!("failed to load analysis data for {window:?}: {e}");
            Vec::new()
        }
    }
}

/// Which window is active plus the last parameters chosen for every kind.
/// Switching kinds never forgets the other kinds' parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSelection {
    kind: WindowKind,
    day: NaiveDate,
    week_start: NaiveDate,
    month: (i32, u32),
    year: i32,
    category: Option<CategoryId>,
}

impl WindowSelection {
    /// Everything anchored on `today`, monthly view active, no category.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            kind: WindowKind::Month,
            day: today,
            week_start: monday_on_or_before(today),
            month: (today.year(), today.month()),
            year: today.year(),
            category: None,
        }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: WindowKind) {
        self.kind = kind;
    }

    pub fn current(&self) -> AnalysisWindow {
        match self.kind {
            WindowKind::Day => AnalysisWindow::Day(self.day),
            WindowKind::Week => AnalysisWindow::Week(self.week_start),
            WindowKind::Month => AnalysisWindow::Month {
                year: self.month.0,
                month: self.month.1,
            },
            WindowKind::Year => AnalysisWindow::Year(self.year),
            WindowKind::Category => AnalysisWindow::Category(self.category),
        }
    }

    /// Make `window` active and remember its parameters.
    pub fn select(&mut self, window: AnalysisWindow) -> Result<()> {
        match window {
            AnalysisWindow::Day(date) => self.day = date,
            AnalysisWindow::Week(date) => self.week_start = monday_on_or_before(date),
            AnalysisWindow::Month { year, month } => {
                check_month(month)?;
                self.month = (year, month);
            }
            AnalysisWindow::Year(year) => self.year = year,
            AnalysisWindow::Category(id) => self.category = id,
        }
        self.kind = window.kind();
        Ok(())
    }

    pub fn category(&self) -> Option<CategoryId> {
        self.category
    }

    /// Pick the first category when none is selected yet.
    pub fn default_category(&mut self, categories: &[Category]) {
        if self.category.is_none() {
            self.category = categories.first().map(|c| c.id);
        }
    }

    /// Move the active window by `delta` units. Category windows step through
    /// `categories` in order, wrapping at both ends.
    pub fn shift(&mut self, delta: i32, categories: &[Category]) {
        match self.kind {
            WindowKind::Day => self.day += Duration::days(i64::from(delta)),
            WindowKind::Week => self.week_start += Duration::weeks(i64::from(delta)),
            WindowKind::Month => self.month = add_months(self.month.0, self.month.1, delta),
            WindowKind::Year => self.year += delta,
            WindowKind::Category => {
                if categories.is_empty() {
                    return;
                }
                let len = categories.len() as i64;
                let next = match self.category.and_then(|id| categories.iter().position(|c| c.id == id)) {
                    Some(pos) => (pos as i64 + i64::from(delta)).rem_euclid(len),
                    None => 0,
                };
                self.category = Some(categories[next as usize].id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[derive(Default)]
    struct FakeSource {
        calls: RefCell<Vec<String>>,
        fail: bool,
    }

    impl FakeSource {
        fn answer(&self, call: String) -> Result<Vec<Expense>> {
            self.calls.borrow_mut().push(call);
            if self.fail {
                return Err(KakeiboError::Api { status: "Bad Gateway".into() });
            }
            Ok(vec![Expense {
                id: 1,
                user_id: 1,
                amount: 300,
                date: d(2025, 1, 1),
                memo: String::new(),
                category_id: 1,
                category: None,
                created_at: None,
                updated_at: None,
            }])
        }
    }

    impl ExpenseSource for FakeSource {
        fn expenses_by_day(&self, date: NaiveDate) -> Result<Vec<Expense>> {
            self.answer(format!("day {date}"))
        }
        fn expenses_by_week(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
            self.answer(format!("week {start} {end}"))
        }
        fn expenses_by_month(&self, year: i32, month: u32) -> Result<Vec<Expense>> {
            self.answer(format!("month {year} {month}"))
        }
        fn expenses_by_year(&self, year: i32) -> Result<Vec<Expense>> {
            self.answer(format!("year {year}"))
        }
        fn expenses_by_category(&self, category_id: CategoryId) -> Result<Vec<Expense>> {
            self.answer(format!("category {category_id}"))
        }
    }

    #[test]
    fn test_monday_normalization_for_every_weekday() {
        // 2025-03-03 is a Monday.
        for offset in 0..7 {
            let date = d(2025, 3, 3) + Duration::days(offset);
            let start = monday_on_or_before(date);
            assert_eq!(start, d(2025, 3, 3), "from {date}");
            assert_eq!(start.weekday(), chrono::Weekday::Mon);
            assert_eq!(week_end(start), d(2025, 3, 9));
        }
    }

    #[test]
    fn test_sunday_belongs_to_preceding_week_across_year_boundary() {
        // 2023-01-01 is a Sunday.
        let AnalysisWindow::Week(start) = AnalysisWindow::week_containing(d(2023, 1, 1)) else {
            panic!("expected a week window");
        };
        assert_eq!(start, d(2022, 12, 26));
        assert_eq!(
            AnalysisWindow::Week(start).query(),
            WindowQuery::Range { start: d(2022, 12, 26), end: d(2023, 1, 1) }
        );
    }

    #[test]
    fn test_queries_per_window() {
        assert_eq!(AnalysisWindow::Day(d(2025, 5, 1)).query(), WindowQuery::Day(d(2025, 5, 1)));
        assert_eq!(
            AnalysisWindow::month(2025, 12).unwrap().query(),
            WindowQuery::Month { year: 2025, month: 12 }
        );
        assert_eq!(AnalysisWindow::Year(2024).query(), WindowQuery::Year(2024));
        assert_eq!(AnalysisWindow::Category(Some(3)).query(), WindowQuery::Category(3));
        assert_eq!(AnalysisWindow::Category(None).query(), WindowQuery::Nothing);
        assert!(AnalysisWindow::month(2025, 13).is_err());
        assert!(AnalysisWindow::month(2025, 0).is_err());
    }

    #[test]
    fn test_unselected_category_never_hits_backend() {
        let source = FakeSource::default();
        let out = fetch_window(&source, &AnalysisWindow::Category(None));
        assert!(out.is_empty());
        assert!(source.calls.borrow().is_empty());

        fetch_window(&source, &AnalysisWindow::Category(Some(2)));
        assert_eq!(*source.calls.borrow(), vec!["category 2"]);
    }

    #[test]
    fn test_week_fetch_uses_inclusive_monday_to_sunday() {
        let source = FakeSource::default();
        fetch_window(&source, &AnalysisWindow::week_containing(d(2025, 3, 6)));
        assert_eq!(*source.calls.borrow(), vec!["week 2025-03-03 2025-03-09"]);
    }

    #[test]
    fn test_failed_fetch_yields_empty_not_stale() {
        let ok = FakeSource::default();
        let window = AnalysisWindow::month(2025, 1).unwrap();
        let mut shown = fetch_window(&ok, &window);
        assert_eq!(shown.len(), 1);

        let failing = FakeSource { fail: true, ..Default::default() };
        shown = fetch_window(&failing, &AnalysisWindow::month(2025, 2).unwrap());
        assert!(shown.is_empty());
        assert!(try_fetch_window(&failing, &window).is_err());
    }

    #[test]
    fn test_selection_remembers_each_kind() {
        let mut sel = WindowSelection::new(d(2025, 3, 6));
        assert_eq!(sel.current(), AnalysisWindow::Month { year: 2025, month: 3 });

        sel.select(AnalysisWindow::Day(d(2025, 1, 15))).unwrap();
        sel.select(AnalysisWindow::Year(2023)).unwrap();
        sel.set_kind(WindowKind::Day);
        assert_eq!(sel.current(), AnalysisWindow::Day(d(2025, 1, 15)));
        sel.set_kind(WindowKind::Month);
        assert_eq!(sel.current(), AnalysisWindow::Month { year: 2025, month: 3 });
        sel.set_kind(WindowKind::Year);
        assert_eq!(sel.current(), AnalysisWindow::Year(2023));
        sel.set_kind(WindowKind::Week);
        assert_eq!(sel.current(), AnalysisWindow::Week(d(2025, 3, 3)));
    }

    #[test]
    fn test_select_week_coerces_to_monday() {
        let mut sel = WindowSelection::new(d(2025, 3, 6));
        sel.select(AnalysisWindow::Week(d(2025, 4, 20))).unwrap();
        assert_eq!(sel.current(), AnalysisWindow::Week(d(2025, 4, 14)));
    }

    #[test]
    fn test_shift_moves_active_window() {
        let mut sel = WindowSelection::new(d(2025, 3, 6));
        sel.set_kind(WindowKind::Week);
        sel.shift(-2, &[]);
        assert_eq!(sel.current(), AnalysisWindow::Week(d(2025, 2, 17)));

        sel.set_kind(WindowKind::Month);
        sel.shift(-3, &[]);
        assert_eq!(sel.current(), AnalysisWindow::Month { year: 2024, month: 12 });
        sel.shift(13, &[]);
        assert_eq!(sel.current(), AnalysisWindow::Month { year: 2026, month: 1 });

        sel.set_kind(WindowKind::Day);
        sel.shift(1, &[]);
        assert_eq!(sel.current(), AnalysisWindow::Day(d(2025, 3, 7)));
    }

    #[test]
    fn test_category_shift_and_default() {
        let cats = vec![
            Category { id: 4, name: "Food".into() },
            Category { id: 7, name: "Rent".into() },
        ];
        let mut sel = WindowSelection::new(d(2025, 3, 6));
        sel.set_kind(WindowKind::Category);
        sel.default_category(&cats);
        assert_eq!(sel.category(), Some(4));
        sel.shift(1, &cats);
        assert_eq!(sel.category(), Some(7));
        sel.shift(1, &cats);
        assert_eq!(sel.category(), Some(4));
        sel.shift(-1, &cats);
        assert_eq!(sel.category(), Some(7));

        // An explicit choice is kept.
        sel.default_category(&cats);
        assert_eq!(sel.category(), Some(7));
    }

    #[test]
    fn test_labels() {
        let dir = CategoryDirectory::new(vec![Category { id: 1, name: "Food".into() }]);
        assert_eq!(AnalysisWindow::Month { year: 2025, month: 3 }.label(&dir), "March 2025");
        assert_eq!(AnalysisWindow::Category(Some(1)).label(&dir), "Food");
        assert_eq!(AnalysisWindow::Category(Some(2)).label(&dir), "unknown");
        assert_eq!(
            AnalysisWindow::Week(d(2025, 3, 3)).label(&dir),
            "Week of 2025-03-03 \u{2013} 2025-03-09"
        );
    }
}
