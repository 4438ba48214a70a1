use crate::catalog::{BookDetail, BookRecord, CatalogClient, CatalogError, DetailView};
use crate::config::Config;
use crate::feed::{
    Applied, Category, FeedAdvisory, FeedController, FilterSignature, PageTicket, ScrollTrigger,
    ViewportMetrics,
};
use crate::keybindings::KeybindingRegistry;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use anyhow::Result;
use lru::LruCache;
use ratatui::style::Style;
use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

/// Detail entries kept across overlay openings.
const DETAIL_CACHE_CAPACITY: usize = 64;

/// How long a status message stays up.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// Background Events
// ============================================================================

/// Results delivered from background tasks to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A page fetch finished. The ticket decides whether it still matters.
    PageLoaded {
        ticket: PageTicket,
        result: Result<Vec<BookRecord>, CatalogError>,
    },
    /// The page fetch task died before producing a result.
    PageAbandoned { ticket: PageTicket, error: String },
    /// Detail enrichment finished.
    ///
    /// Fields:
    /// - `key`: detail key the request was made for
    /// - `generation`: `detail_generation` when the load was spawned
    DetailLoaded {
        key: String,
        generation: u64,
        result: Result<BookDetail, CatalogError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Detail Overlay
// ============================================================================

/// Record shown in the detail overlay plus whatever enrichment has arrived.
#[derive(Debug, Clone)]
pub struct DetailOverlay {
    pub record: BookRecord,
    pub detail: Option<BookDetail>,
    pub loading: bool,
}

impl DetailOverlay {
    pub fn view(&self) -> DetailView {
        DetailView::merge(&self.record, self.detail.as_ref())
    }
}

/// A detail fetch the caller should spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub key: String,
    pub generation: u64,
}

// ============================================================================
// App State
// ============================================================================

pub struct App {
    pub client: CatalogClient,
    pub feed: FeedController,
    pub trigger: ScrollTrigger,

    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    /// Selected category tab.
    pub category: Category,
    /// Search term the feed is currently filtered by.
    pub search_term: String,

    pub selected: usize,
    /// First list row on screen.
    pub list_scroll: usize,
    /// Book rows that fit in the list area, set by the renderer.
    pub list_visible_rows: usize,

    pub search_mode: bool,
    pub search_input: String,
    /// Time of the last edit that has not been applied yet.
    pub search_debounce: Option<Instant>,
    pub search_debounce_after: Duration,

    /// Last failure for the active signature. Automatic loading pauses
    /// while set; the user retries with LoadMore.
    pub last_failure: Option<FeedAdvisory>,
    pub fetch_handle: Option<tokio::task::JoinHandle<()>>,

    pub detail: Option<DetailOverlay>,
    /// Incremented for each detail load; results carrying an older value are dropped.
    pub detail_generation: u64,
    pub detail_handle: Option<tokio::task::JoinHandle<()>>,
    pub detail_cache: LruCache<String, BookDetail>,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(client: CatalogClient, config: &Config) -> Result<Self> {
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!(%warning, "Keybinding override ignored");
        }

        let capacity = NonZeroUsize::new(DETAIL_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            client,
            feed: FeedController::new(),
            trigger: ScrollTrigger::new(config.scroll_threshold_rows),
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            category: config.default_category()?,
            search_term: String::new(),
            selected: 0,
            list_scroll: 0,
            list_visible_rows: 0,
            search_mode: false,
            search_input: String::new(),
            search_debounce: None,
            search_debounce_after: config.search_debounce(),
            last_failure: None,
            fetch_handle: None,
            detail: None,
            detail_generation: 0,
            detail_handle: None,
            detail_cache: LruCache::new(capacity),
            show_help: false,
            help_scroll_offset: 0,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        })
    }

    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Returns the name of the new theme for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------
    // Filter changes
    // ------------------------------------------------------------------

    pub fn signature(&self) -> FilterSignature {
        FilterSignature::new(self.category, &self.search_term)
    }

    /// Push the current category and search term to the feed.
    ///
    /// Returns the first-page ticket when the signature actually changed.
    pub fn refresh_filter(&mut self) -> Option<PageTicket> {
        let ticket = self.feed.set_filter(self.signature())?;
        self.selected = 0;
        self.list_scroll = 0;
        self.last_failure = None;
        self.needs_redraw = true;
        Some(ticket)
    }

    pub fn select_category(&mut self, category: Category) -> Option<PageTicket> {
        self.category = category;
        self.refresh_filter()
    }

    pub fn next_category(&mut self) -> Option<PageTicket> {
        self.select_category(self.category.next())
    }

    pub fn prev_category(&mut self) -> Option<PageTicket> {
        self.select_category(self.category.prev())
    }

    // ------------------------------------------------------------------
    // Search input
    // ------------------------------------------------------------------

    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.search_input = self.search_term.clone();
        self.search_debounce = None;
    }

    pub fn push_search_char(&mut self, c: char) {
        if self.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            self.set_status("Search term too long");
            return;
        }
        self.search_input.push(c);
        self.search_debounce = Some(Instant::now());
    }

    pub fn pop_search_char(&mut self) {
        if self.search_input.pop().is_some() {
            self.search_debounce = Some(Instant::now());
        }
    }

    /// Apply `search_input` now and leave the search bar.
    pub fn commit_search(&mut self) -> Option<PageTicket> {
        self.search_mode = false;
        self.search_debounce = None;
        self.search_term = self.search_input.clone();
        self.refresh_filter()
    }

    /// Drop the search term and return to category browsing.
    pub fn clear_search(&mut self) -> Option<PageTicket> {
        self.search_mode = false;
        self.search_debounce = None;
        self.search_input.clear();
        self.search_term.clear();
        self.refresh_filter()
    }

    /// Apply the search once typing has paused for the debounce period.
    pub fn poll_search_debounce(&mut self) -> Option<PageTicket> {
        let edited = self.search_debounce?;
        if edited.elapsed() < self.search_debounce_after {
            return None;
        }
        self.search_debounce = None;
        self.search_term = self.search_input.clone();
        self.refresh_filter()
    }

    // ------------------------------------------------------------------
    // Feed results
    // ------------------------------------------------------------------

    /// Apply a finished page fetch and report it to the user.
    pub fn handle_page_loaded(
        &mut self,
        ticket: &PageTicket,
        result: Result<Vec<BookRecord>, CatalogError>,
    ) -> Applied {
        let applied = self.feed.apply(ticket, result);
        match &applied {
            Applied::Appended { .. } | Applied::Exhausted => {
                self.last_failure = None;
                self.needs_redraw = true;
            }
            Applied::Failed(advisory) => {
                let hint = self
                    .keybindings
                    .key_hint(crate::keybindings::Action::LoadMore)
                    .unwrap_or_else(|| "r".to_string());
                self.set_status(format!("{} (press {} to retry)", advisory.message, hint));
                self.last_failure = Some(advisory.clone());
                self.needs_redraw = true;
            }
            Applied::Discarded => {}
        }
        self.clamp_selection();
        applied
    }

    pub fn handle_page_abandoned(&mut self, ticket: &PageTicket, error: &str) {
        if self.feed.abandon(ticket) {
            self.last_failure = Some(FeedAdvisory {
                kind: crate::catalog::ErrorKind::Network,
                message: format!("Page load failed: {}", error),
            });
            self.needs_redraw = true;
        }
    }

    /// Explicit request for the next page; also the retry path after a failure.
    pub fn load_more(&mut self) -> Option<PageTicket> {
        if self.feed.state().is_exhausted() {
            self.set_status("No more results");
            return None;
        }
        let ticket = self.feed.load_next_page()?;
        self.last_failure = None;
        self.needs_redraw = true;
        Some(ticket)
    }

    /// Ticket for the next page when the viewport is close to the end.
    pub fn poll_near_bottom(&mut self) -> Option<PageTicket> {
        if self.last_failure.is_some() || self.list_visible_rows == 0 {
            return None;
        }
        self.feed.on_near_bottom(&self.trigger, self.viewport())
    }

    pub fn viewport(&self) -> ViewportMetrics {
        ViewportMetrics {
            first_visible: self.list_scroll,
            visible_rows: self.list_visible_rows,
            total_rows: self.feed.state().len(),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn selected_record(&self) -> Option<&BookRecord> {
        self.feed.items().get(self.selected)
    }

    pub fn nav_down(&mut self) {
        self.move_selection(1);
    }

    pub fn nav_up(&mut self) {
        self.move_selection(-1);
    }

    pub fn page_down(&mut self) {
        let step = self.list_visible_rows.max(1) as isize;
        self.move_selection(step);
    }

    pub fn page_up(&mut self) {
        let step = self.list_visible_rows.max(1) as isize;
        self.move_selection(-step);
    }

    pub fn jump_top(&mut self) {
        self.selected = 0;
        self.ensure_selection_visible();
    }

    pub fn jump_bottom(&mut self) {
        self.selected = self.feed.state().len().saturating_sub(1);
        self.ensure_selection_visible();
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.feed.state().len();
        if len == 0 {
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
        self.ensure_selection_visible();
    }

    fn ensure_selection_visible(&mut self) {
        let rows = self.list_visible_rows.max(1);
        if self.selected < self.list_scroll {
            self.list_scroll = self.selected;
        } else if self.selected >= self.list_scroll + rows {
            self.list_scroll = self.selected + 1 - rows;
        }
    }

    /// Keep selection and scroll inside the loaded list, e.g. after a
    /// resize or a reset.
    pub fn clamp_selection(&mut self) {
        let len = self.feed.state().len();
        self.selected = self.selected.min(len.saturating_sub(1));
        self.list_scroll = self.list_scroll.min(len.saturating_sub(1));
        self.ensure_selection_visible();
    }

    /// Record the list height from the last render.
    pub fn set_visible_rows(&mut self, rows: usize) {
        if self.list_visible_rows != rows {
            self.list_visible_rows = rows;
            self.clamp_selection();
        }
    }

    // ------------------------------------------------------------------
    // Detail overlay
    // ------------------------------------------------------------------

    /// Open the overlay for the selected record.
    ///
    /// Returns a request to spawn when enrichment is neither cached nor
    /// already unavailable.
    pub fn open_detail(&mut self) -> Option<DetailRequest> {
        let record = self.selected_record()?.clone();
        self.close_detail();

        let Some(key) = record.detail_key.clone() else {
            self.detail = Some(DetailOverlay { record, detail: None, loading: false });
            return None;
        };

        if let Some(cached) = self.detail_cache.get(&key) {
            tracing::debug!(key = %key, "Detail cache hit");
            let detail = Some(cached.clone());
            self.detail = Some(DetailOverlay { record, detail, loading: false });
            return None;
        }

        self.detail_generation += 1;
        self.detail = Some(DetailOverlay { record, detail: None, loading: true });
        Some(DetailRequest {
            key,
            generation: self.detail_generation,
        })
    }

    pub fn close_detail(&mut self) {
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted detail load on overlay close");
        }
        self.detail = None;
        self.needs_redraw = true;
    }

    pub fn handle_detail_loaded(
        &mut self,
        key: String,
        generation: u64,
        result: Result<BookDetail, CatalogError>,
    ) {
        if generation != self.detail_generation {
            tracing::debug!(key = %key, generation, current = self.detail_generation, "Dropping stale detail");
            return;
        }
        self.detail_handle = None;

        let Some(overlay) = self.detail.as_mut() else {
            return;
        };
        if overlay.record.detail_key.as_deref() != Some(key.as_str()) {
            return;
        }
        overlay.loading = false;
        match result {
            Ok(detail) => {
                self.detail_cache.put(key, detail.clone());
                overlay.detail = Some(detail);
            }
            Err(e) => {
                // Enrichment is optional; the overlay falls back to record fields.
                tracing::debug!(key = %key, error = %e, "Detail unavailable");
            }
        }
        self.needs_redraw = true;
    }

    /// Catalog page for the record in the overlay, or else the selection.
    pub fn current_page_url(&self) -> Option<String> {
        let record = match &self.detail {
            Some(overlay) => &overlay.record,
            None => self.selected_record()?,
        };
        record.page_url(self.client.base_url())
    }

    // ------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// True while anything animated is on screen.
    pub fn is_busy(&self) -> bool {
        self.feed.state().in_flight() || self.detail.as_ref().is_some_and(|d| d.loading)
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted page fetch on App drop");
        }
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted detail load on App drop");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
