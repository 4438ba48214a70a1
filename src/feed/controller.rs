//! Paginated feed controller.
//!
//! The controller never performs I/O itself. Starting a fetch yields a
//! [`PageTicket`]; whoever runs the ticket (a tokio task in the TUI, a plain
//! `await` in headless mode) reports back through [`FeedController::apply`].
//! Every outcome is checked against the active signature and the request
//! sequence before it may touch [`FeedState`], so a reply that was overtaken
//! by a filter change is dropped on arrival.

use super::query::{resolve, FilterSignature, PageRequest};
use super::state::FeedState;
use super::trigger::{ScrollTrigger, ViewportMetrics};
use crate::catalog::{BookRecord, CatalogError, ErrorKind};

/// A fetch the controller has started and is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    pub signature: FilterSignature,
    pub offset: usize,
    pub request: PageRequest,
    pub seq: u64,
}

/// Recoverable failure surfaced to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedAdvisory {
    pub kind: ErrorKind,
    pub message: String,
}

/// What applying a fetch outcome did to the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// New records appended; `duplicates` were already present.
    Appended { added: usize, duplicates: usize },
    /// Empty page: no more results for this signature.
    Exhausted,
    /// Outcome belonged to a superseded request and was ignored.
    Discarded,
    /// Fetch failed; feed unchanged apart from clearing in-flight.
    Failed(FeedAdvisory),
}

/// Owns the feed state and decides which page to fetch next.
#[derive(Debug, Default)]
pub struct FeedController {
    state: FeedState,
    next_seq: u64,
}

impl FeedController {
    /// A controller with no active signature. The first [`set_filter`]
    /// always starts a fetch.
    ///
    /// [`set_filter`]: FeedController::set_filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn items(&self) -> &[BookRecord] {
        self.state.items()
    }

    /// Switch to `signature` and start its first page.
    ///
    /// Returns `None` when `signature` is already active.
    pub fn set_filter(&mut self, signature: FilterSignature) -> Option<PageTicket> {
        if self.state.active_signature() == Some(&signature) {
            return None;
        }

        if let Some(seq) = self.state.in_flight_seq() {
            tracing::debug!(seq, "Filter changed with fetch outstanding; its result will be dropped");
        }
        tracing::info!(
            category = %signature.category(),
            search = %signature.search_term(),
            "Feed filter changed"
        );

        self.state.reset(signature);
        self.issue()
    }

    /// Start the next page unless one is outstanding or results ran out.
    pub fn load_next_page(&mut self) -> Option<PageTicket> {
        if self.state.in_flight() || self.state.is_exhausted() {
            return None;
        }
        self.issue()
    }

    /// Near-bottom signal from the view.
    pub fn on_near_bottom(
        &mut self,
        trigger: &ScrollTrigger,
        metrics: ViewportMetrics,
    ) -> Option<PageTicket> {
        if trigger.is_near_bottom(metrics) {
            self.load_next_page()
        } else {
            None
        }
    }

    fn issue(&mut self) -> Option<PageTicket> {
        let signature = self.state.active_signature()?.clone();
        let offset = self.state.offset();

        self.next_seq = self.next_seq.wrapping_add(1);
        let seq = self.next_seq;
        self.state.set_in_flight(Some(seq));

        tracing::debug!(seq, offset, "Requesting page");
        Some(PageTicket {
            request: resolve(&signature, offset),
            signature,
            offset,
            seq,
        })
    }

    fn is_current(&self, ticket: &PageTicket) -> bool {
        self.state.active_signature() == Some(&ticket.signature)
            && self.state.in_flight_seq() == Some(ticket.seq)
    }

    /// Apply the outcome of `ticket`.
    pub fn apply(
        &mut self,
        ticket: &PageTicket,
        outcome: Result<Vec<BookRecord>, CatalogError>,
    ) -> Applied {
        match outcome {
            Ok(records) => self.apply_page(ticket, records),
            Err(e) => self.apply_failure(ticket, &e),
        }
    }

    /// Apply a successfully fetched page.
    pub fn apply_page(&mut self, ticket: &PageTicket, records: Vec<BookRecord>) -> Applied {
        if !self.is_current(ticket) {
            tracing::debug!(seq = ticket.seq, offset = ticket.offset, "Discarding stale page");
            return Applied::Discarded;
        }

        self.state.set_in_flight(None);
        self.state.set_offset(ticket.offset + ticket.request.limit);

        if records.is_empty() {
            self.state.mark_exhausted();
            tracing::info!(offset = ticket.offset, total = self.state.len(), "End of results");
            return Applied::Exhausted;
        }

        let (added, duplicates) = self.state.append(records);
        if duplicates > 0 {
            tracing::debug!(duplicates, "Dropped records already in the feed");
        }
        tracing::debug!(added, total = self.state.len(), next_offset = self.state.offset(), "Page applied");
        Applied::Appended { added, duplicates }
    }

    /// Forget `ticket` without an outcome, e.g. when its task died.
    ///
    /// Returns false if the ticket was already superseded.
    pub fn abandon(&mut self, ticket: &PageTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state.set_in_flight(None);
        tracing::warn!(seq = ticket.seq, offset = ticket.offset, "Page fetch abandoned");
        true
    }

    /// Apply a failed fetch. The same page can be requested again.
    pub fn apply_failure(&mut self, ticket: &PageTicket, error: &CatalogError) -> Applied {
        if !self.is_current(ticket) {
            tracing::debug!(seq = ticket.seq, error = %error, "Ignoring failure of stale request");
            return Applied::Discarded;
        }

        self.state.set_in_flight(None);
        tracing::warn!(offset = ticket.offset, error = %error, "Page fetch failed");
        Applied::Failed(FeedAdvisory {
            kind: error.kind(),
            message: error.to_string(),
        })
    }
}
