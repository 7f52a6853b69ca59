pub mod text;
pub mod view;

use std::io::IsTerminal;

use chrono::NaiveDate;

use crate::cli::{parse_date, parse_month, Context, ReportArgs, WindowArgs};
use crate::error::{KakeiboError, Result};
use crate::report::CategoryDirectory;
use crate::window::{fetch_window, AnalysisWindow};

pub fn dispatch(ctx: &Context, args: &ReportArgs) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let categories = match ctx.categories() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("failed to load categories: {e}");
            CategoryDirectory::default()
        }
    };
    let window = resolve_window(&args.window, today, &categories)?;

    if !args.text && std::io::stdout().is_terminal() {
        view::run(ctx, window, today, categories)
    } else {
        let expenses = fetch_window(&ctx.client, &window);
        println!("{}", text::render(&window, &expenses, &categories, ctx.symbol()));
        Ok(())
    }
}

/// Turn the mutually exclusive window flags into a window. No flag means the
/// month containing `today`.
pub(crate) fn resolve_window(
    args: &WindowArgs,
    today: NaiveDate,
    categories: &CategoryDirectory,
) -> Result<AnalysisWindow> {
    if let Some(day) = &args.day {
        return Ok(AnalysisWindow::Day(parse_date(day)?));
    }
    if let Some(week) = &args.week {
        return Ok(AnalysisWindow::week_containing(parse_date(week)?));
    }
    if let Some(month) = &args.month {
        let (year, month) = parse_month(month)?;
        return AnalysisWindow::month(year, month);
    }
    if let Some(year) = args.year {
        return Ok(AnalysisWindow::Year(year));
    }
    if let Some(category) = &args.category {
        let id = match category {
            Some(key) => Some(
                categories
                    .find(key)
                    .map(|c| c.id)
                    .ok_or_else(|| KakeiboError::InvalidArgument(format!("unknown category: {key}")))?,
            ),
            None => None,
        };
        return Ok(AnalysisWindow::Category(id));
    }
    AnalysisWindow::month(chrono::Datelike::year(&today), chrono::Datelike::month(&today))
}
