//! Analysis state shared by the interactive view: the window selection, the
//! expenses currently shown, and the guard that drops out-of-order responses.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::api::ExpenseSource;
use crate::error::Result;
use crate::models::Expense;
use crate::window::{try_fetch_window, AnalysisWindow, WindowSelection};

/// A request in flight. Only the ticket with the highest `seq` may update the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub window: AnalysisWindow,
}

pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Expense>>,
}

pub struct AnalysisSession {
    selection: WindowSelection,
    latest: u64,
    expenses: Vec<Expense>,
    shown: Option<AnalysisWindow>,
    loading: bool,
}

impl AnalysisSession {
    pub fn new(selection: WindowSelection) -> Self {
        Self {
            selection,
            latest: 0,
            expenses: Vec::new(),
            shown: None,
            loading: false,
        }
    }

    pub fn selection(&self) -> &WindowSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut WindowSelection {
        &mut self.selection
    }

    /// Issue a new ticket for the current window. Any older ticket becomes
    /// stale from this point on.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest += 1;
        self.loading = true;
        FetchTicket {
            seq: self.latest,
            window: self.selection.current(),
        }
    }

    /// Apply a finished fetch. Returns false (and changes nothing) when a newer
    /// ticket has been issued since. A failure replaces the shown data with an
    /// empty set.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<Vec<Expense>>) -> bool {
        if ticket.seq != self.latest {
            log::debug!(
                "discarding stale response #{} for {:?} (latest #{})",
                ticket.seq,
                ticket.window,
                self.latest
            );
            return false;
        }
        self.expenses = match result {
            Ok(expenses) => expenses,
            Err(e) => {
                log::warn!("failed to load analysis data for {:?}: {e}", ticket.window);
                Vec::new()
            }
        };
        self.shown = Some(ticket.window);
        self.loading = false;
        true
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Window the shown expenses belong to, if any fetch has landed yet.
    pub fn shown_window(&self) -> Option<AnalysisWindow> {
        self.shown
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Run `ticket`'s fetch on a worker thread and send the outcome to `tx`.
pub fn spawn_fetch(
    source: Arc<dyn ExpenseSource + Send + Sync>,
    ticket: FetchTicket,
    tx: Sender<FetchOutcome>,
) {
    std::thread::spawn(move || {
        let result = try_fetch_window(source.as_ref(), &ticket.window);
        // The receiver is gone once the view closes; nothing left to update.
        let _ = tx.send(FetchOutcome { ticket, result });
    });
}
