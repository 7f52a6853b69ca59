use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use chrono::NaiveDate;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use crate::api::ExpenseSource;
use crate::cli::Context;
use crate::error::Result;
use crate::fmt::{money, percent};
use crate::report::{category_breakdown, total_amount, Breakdown, CategoryDirectory};
use crate::session::{spawn_fetch, AnalysisSession, FetchOutcome};
use crate::tui::{
    hex_color, money_span, run_view, View, ViewAction, AMOUNT_STYLE, FOOTER_STYLE, HEADER_STYLE,
    SELECTED_STYLE,
};
use crate::window::{AnalysisWindow, WindowKind, WindowSelection};

const HEADER_ROW_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::BOLD);

const KINDS: &[(WindowKind, char)] = &[
    (WindowKind::Day, 'd'),
    (WindowKind::Week, 'w'),
    (WindowKind::Month, 'm'),
    (WindowKind::Year, 'y'),
    (WindowKind::Category, 'c'),
];

pub fn run(
    ctx: &Context,
    window: AnalysisWindow,
    today: NaiveDate,
    categories: CategoryDirectory,
) -> Result<()> {
    let source: Arc<dyn ExpenseSource + Send + Sync> = Arc::new(ctx.client.clone());
    let mut view = AnalysisView::new(source, window, today, categories, ctx.symbol())?;
    run_view(&mut view)
}

/// Interactive analysis: switch window kinds, step through periods, and
/// watch the breakdown update as responses arrive.
pub(crate) struct AnalysisView {
    source: Arc<dyn ExpenseSource + Send + Sync>,
    session: AnalysisSession,
    categories: CategoryDirectory,
    breakdown: Breakdown,
    symbol: String,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    offset: usize,
    visible_count: usize,
}

impl AnalysisView {
    pub(crate) fn new(
        source: Arc<dyn ExpenseSource + Send + Sync>,
        window: AnalysisWindow,
        today: NaiveDate,
        categories: CategoryDirectory,
        symbol: &str,
    ) -> Result<Self> {
        let mut selection = WindowSelection::new(today);
        selection.select(window)?;
        selection.default_category(categories.as_slice());

        let (tx, rx) = mpsc::channel();
        let mut view = Self {
            source,
            session: AnalysisSession::new(selection),
            categories,
            breakdown: Breakdown { entries: Vec::new(), total: 0 },
            symbol: symbol.to_string(),
            tx,
            rx,
            offset: 0,
            visible_count: 10,
        };
        view.reload();
        Ok(view)
    }

    fn reload(&mut self) {
        self.offset = 0;
        let ticket = self.session.begin_fetch();
        spawn_fetch(self.source.clone(), ticket, self.tx.clone());
    }

    /// Apply every response that has arrived; stale ones are dropped by the session.
    fn drain(&mut self) {
        let mut changed = false;
        while let Ok(outcome) = self.rx.try_recv() {
            changed |= self.session.complete(outcome.ticket, outcome.result);
        }
        if changed {
            self.breakdown = category_breakdown(self.session.expenses(), &self.categories);
        }
    }

    fn switch_kind(&mut self, kind: WindowKind) {
        if self.session.selection().kind() != kind {
            self.session.selection_mut().set_kind(kind);
            self.reload();
        }
    }

    fn shift(&mut self, delta: i32) {
        let categories = self.categories.as_slice();
        self.session.selection_mut().shift(delta, categories);
        self.reload();
    }

    fn title(&self) -> String {
        let window = self.session.selection().current();
        let loading = if self.session.is_loading() { "  (loading\u{2026})" } else { "" };
        format!(
            " {} \u{2014} {}{loading}",
            window.kind().label(),
            window.label(&self.categories)
        )
    }

    fn tabs(&self) -> Line<'static> {
        let active = self.session.selection().kind();
        let mut spans = vec![Span::raw(" ")];
        for (kind, key) in KINDS {
            let label = format!(" {key}:{} ", kind.label());
            let style = if *kind == active { SELECTED_STYLE } else { FOOTER_STYLE };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn draw_breakdown(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        if self.breakdown.entries.is_empty() {
            frame.render_widget(Paragraph::new(" No data").style(FOOTER_STYLE), area);
            return;
        }
        let rows = Layout::vertical(
            self.breakdown
                .entries
                .iter()
                .map(|_| Constraint::Length(1))
                .collect::<Vec<_>>(),
        )
        .split(area);
        for (entry, row) in self.breakdown.entries.iter().zip(rows.iter()) {
            let [name_area, gauge_area] =
                Layout::horizontal([Constraint::Length(36), Constraint::Fill(1)]).areas(*row);
            frame.render_widget(
                Paragraph::new(format!(
                    " {:<16} {:>10} {:>6}",
                    entry.name,
                    money(entry.amount, &self.symbol),
                    percent(entry.percentage)
                )),
                name_area,
            );
            let ratio = (entry.percentage / 100.0).clamp(0.0, 1.0);
            frame.render_widget(
                Gauge::default()
                    .gauge_style(Style::new().fg(hex_color(entry.color)))
                    .ratio(ratio)
                    .label(""),
                gauge_area,
            );
        }
    }

    fn draw_history(&mut self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        self.visible_count = visible.max(1);
        let expenses = self.session.expenses();

        let rows: Vec<Row> = expenses
            .iter()
            .skip(self.offset)
            .take(visible)
            .map(|e| {
                Row::new(vec![
                    Cell::from(e.date.format("%Y-%m-%d").to_string()),
                    Cell::from(
                        self.categories
                            .name_for(e.category.as_ref(), e.category_id)
                            .to_string(),
                    ),
                    Cell::from(money_span(e.amount, &self.symbol)),
                ])
            })
            .collect();
        let header = Row::new(["Date", "Category", "Amount"])
            .style(HEADER_ROW_STYLE)
            .bottom_margin(1);
        let table = Table::new(
            rows,
            [Constraint::Length(12), Constraint::Fill(1), Constraint::Length(14)],
        )
        .header(header)
        .column_spacing(2);
        frame.render_widget(table, area);
    }
}

impl View for AnalysisView {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let show_breakdown = self.session.selection().kind() != WindowKind::Category;
        let breakdown_height = if show_breakdown {
            (self.breakdown.entries.len().max(1) as u16).min(area.height / 3) + 2
        } else {
            0
        };
        let [header_area, tabs_area, total_area, breakdown_area, history_title, history_area, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(breakdown_height),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_widget(Paragraph::new(self.title()).style(HEADER_STYLE), header_area);
        frame.render_widget(Paragraph::new(self.tabs()), tabs_area);

        let total = total_amount(self.session.expenses());
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(" Total spent: "),
                Span::styled(
                    money(total, &self.symbol),
                    AMOUNT_STYLE.add_modifier(Modifier::BOLD),
                ),
            ])),
            total_area,
        );

        if show_breakdown {
            let [label, bars] =
                Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(breakdown_area);
            frame.render_widget(Paragraph::new(" Category Breakdown").style(HEADER_STYLE), label);
            self.draw_breakdown(frame, bars);
        }

        frame.render_widget(
            Paragraph::new(format!(" History ({})", self.session.expenses().len()))
                .style(HEADER_STYLE),
            history_title,
        );
        self.draw_history(frame, history_area);

        frame.render_widget(
            Paragraph::new(
                " d/w/m/y/c=window  \u{2190}/\u{2192}=prev/next  \u{2191}/\u{2193}=scroll  q/Esc=close",
            )
            .style(FOOTER_STYLE),
            footer_area,
        );
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        let max = self
            .session
            .expenses()
            .len()
            .saturating_sub(self.visible_count);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Close,
            KeyCode::Left | KeyCode::Char('h') => self.shift(-1),
            KeyCode::Right | KeyCode::Char('l') => self.shift(1),
            KeyCode::Up | KeyCode::Char('k') => self.offset = self.offset.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.offset = (self.offset + 1).min(max),
            KeyCode::PageUp => self.offset = self.offset.saturating_sub(self.visible_count),
            KeyCode::PageDown => self.offset = (self.offset + self.visible_count).min(max),
            KeyCode::Char(c) => {
                if let Some((kind, _)) = KINDS.iter().find(|(_, key)| *key == c) {
                    self.switch_kind(*kind);
                }
            }
            _ => {}
        }
        ViewAction::Continue
    }

    fn tick(&mut self) {
        self.drain();
    }
}
