//! Browser TUI state management.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use nomflix_core::banner::Banner;
use nomflix_core::carousel::{AdvanceOutcome, Carousel, CarouselError};
use nomflix_core::catalog::CatalogItem;
use nomflix_core::fetch::{LatestSlot, Loadable, RequestToken};
use nomflix_core::overlay::{Navigator, OverlayState, resolve_selection};
use nomflix_core::route::Route;
use nomflix_core::section::{RowId, Section};
use nomflix_core::slide::Transition;
use ratatui::layout::Rect;

/// Length of the card-to-detail morph.
pub const OVERLAY_MORPH: Duration = Duration::from_millis(250);

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search keyword input mode.
    Search,
}

/// Paging settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// Items per page in the movies section.
    pub movie_offset: usize,
    /// Items per page in the TV section.
    pub tv_offset: usize,
    /// Columns of the search grid.
    pub search_columns: usize,
    /// Page slide duration; zero acknowledges every advance immediately.
    pub transition: Duration,
}

impl Paging {
    /// Items per page for `section`.
    #[must_use]
    pub const fn offset_for(&self, section: Section) -> usize {
        match section {
            Section::Movies => self.movie_offset,
            Section::Tv => self.tv_offset,
            Section::Search => self.search_columns,
        }
    }
}

/// Work the event loop must hand to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Fetch a row's list endpoint.
    Row(RowId),
    /// Run a multi-search.
    Search {
        /// Search keyword.
        keyword: String,
        /// Token the response must carry.
        token: RequestToken,
    },
}

/// A finished fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Row items or an error message.
    Row {
        /// Row fetched.
        row: RowId,
        /// Items in response order.
        result: Result<Vec<CatalogItem>, String>,
    },
    /// Search results or an error message.
    Search {
        /// Token of the request.
        token: RequestToken,
        /// Movie and TV results.
        result: Result<Vec<CatalogItem>, String>,
    },
}

/// State for the browser TUI.
#[derive(Debug)]
pub struct BrowserState {
    navigator: Navigator,
    carousel: Carousel,
    paging: Paging,
    rows: HashMap<RowId, Loadable<Vec<CatalogItem>>>,
    search: LatestSlot<String, Vec<CatalogItem>>,
    transitions: HashMap<RowId, Transition>,
    mounted: Option<Section>,
    pending: Vec<FetchRequest>,
    overlay_opened: Option<Instant>,
    /// Focused row index within the section (rows view).
    pub focus_row: usize,
    /// Focused card index within the visible page, or within the search grid.
    pub focus_card: usize,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Search keyword being typed.
    pub search_input: String,
    /// Last drawn area of each card, keyed by layout key.
    pub card_areas: HashMap<String, Rect>,
}

impl BrowserState {
    /// Creates the state at `initial` and queues the fetches it needs.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::ZeroOffset`] if either section offset is 0.
    /// A zero column count is raised to one.
    pub fn new(initial: Route, mut paging: Paging, now: Instant) -> Result<Self, CarouselError> {
        if let Some(row) = RowId::ALL
            .into_iter()
            .find(|row| paging.offset_for(row.section()) == 0)
        {
            return Err(CarouselError::ZeroOffset(row));
        }
        paging.search_columns = paging.search_columns.max(1);

        let mut state = Self {
            navigator: Navigator::new(initial),
            carousel: Carousel::new(),
            paging,
            rows: HashMap::new(),
            search: LatestSlot::default(),
            transitions: HashMap::new(),
            mounted: None,
            pending: Vec::new(),
            overlay_opened: None,
            focus_row: 0,
            focus_card: 0,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            card_areas: HashMap::new(),
        };
        state.sync_route(now);
        Ok(state)
    }

    /// Mounts the current section's rows and queues missing fetches.
    fn sync_route(&mut self, now: Instant) {
        let route = self.navigator.route().clone();

        if self.mounted != Some(route.section) {
            if let Some(previous) = self.mounted.take() {
                for &row in previous.rows() {
                    self.carousel.unmount(row);
                    self.transitions.remove(&row);
                }
            }
            let offset = self.paging.offset_for(route.section);
            for &row in route.section.rows() {
                if let Err(err) = self.carousel.mount(row, offset) {
                    tracing::error!(%err, "failed to mount row");
                    continue;
                }
                let needs_fetch = match self.rows.get(&row) {
                    Some(Loadable::Ready(items)) => {
                        self.carousel.load(row, row.pageable(items).len());
                        false
                    }
                    Some(Loadable::Loading) => false,
                    Some(Loadable::Failed(_)) | None => true,
                };
                if needs_fetch {
                    self.rows.insert(row, Loadable::Loading);
                    self.pending.push(FetchRequest::Row(row));
                }
            }
            self.mounted = Some(route.section);
            self.focus_row = 0;
            self.focus_card = 0;
        }

        if route.section == Section::Search
            && let Some(keyword) = &route.keyword
            && (!self.search.is_for(keyword)
                || matches!(self.search.value(), Loadable::Failed(_)))
        {
            let token = self.search.begin(keyword.clone());
            tracing::debug!(%keyword, token = token.sequence(), "searching");
            self.pending.push(FetchRequest::Search {
                keyword: keyword.clone(),
                token,
            });
            self.focus_card = 0;
        }

        match (route.item_id.is_some(), self.overlay_opened) {
            (true, None) => self.overlay_opened = Some(now),
            (false, Some(_)) => self.overlay_opened = None,
            _ => {}
        }
        self.clamp_focus();
    }

    /// Drains the queued fetch requests.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Applies a finished fetch.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Row { row, result } => {
                if let Err(message) = &result {
                    tracing::error!(%row, error = %message, "failed to load row");
                }
                let loadable = Loadable::from(result);
                if let Loadable::Ready(items) = &loadable {
                    tracing::debug!(%row, count = items.len(), "row loaded");
                    if self.carousel.is_mounted(row) {
                        self.carousel.load(row, row.pageable(items).len());
                    }
                }
                self.rows.insert(row, loadable);
            }
            FetchOutcome::Search { token, result } => {
                if let Err(message) = &result {
                    tracing::error!(error = %message, "search failed");
                }
                self.search.complete(token, result);
            }
        }
        self.clamp_focus();
    }

    /// Acknowledges every transition that has finished at `now`.
    pub fn tick(&mut self, now: Instant) {
        let finished: Vec<RowId> = self
            .transitions
            .iter()
            .filter(|(_, transition)| transition.is_complete(now))
            .map(|(row, _)| *row)
            .collect();
        for row in finished {
            self.transitions.remove(&row);
            self.carousel.acknowledge_transition_complete(row);
        }
    }

    /// Current route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        self.navigator.route()
    }

    /// Current section.
    #[must_use]
    pub const fn section(&self) -> Section {
        self.navigator.route().section
    }

    /// Overlay state of the current route.
    #[must_use]
    pub fn overlay(&self) -> OverlayState {
        self.navigator.overlay()
    }

    /// Whether the whole view should show the loading placeholder.
    ///
    /// Failed rows count as loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        match self.section() {
            Section::Search => {
                self.route().keyword.is_some() && self.search.value().is_pending()
            }
            section => section
                .rows()
                .iter()
                .any(|row| self.rows.get(row).is_none_or(Loadable::is_pending)),
        }
    }

    /// All fetched items of `row`, in response order.
    fn all_items(&self, row: RowId) -> &[CatalogItem] {
        self.rows
            .get(&row)
            .and_then(Loadable::ready)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Items `row` pages through.
    #[must_use]
    pub fn row_items(&self, row: RowId) -> &[CatalogItem] {
        row.pageable(self.all_items(row))
    }

    /// Items on the current page of `row`.
    #[must_use]
    pub fn visible(&self, row: RowId) -> &[CatalogItem] {
        self.carousel.window_for(row, self.row_items(row))
    }

    /// Outgoing page and progress of an in-flight slide on `row`.
    #[must_use]
    pub fn slide(&self, row: RowId, now: Instant) -> Option<(usize, f64)> {
        self.transitions
            .get(&row)
            .map(|transition| (transition.from_page, transition.progress(now)))
    }

    /// Items per page in the current section.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.paging.offset_for(self.section())
    }

    /// Banner of the current section.
    #[must_use]
    pub fn banner(&self) -> Option<Banner> {
        let section = self.section();
        let item = self.all_items(section.banner_row()?).first()?;
        Some(Banner::from_item(item, section.overview_style()))
    }

    /// Results of the latest search.
    #[must_use]
    pub fn search_results(&self) -> &[CatalogItem] {
        self.search
            .value()
            .ready()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Item named by the route, if it is among the loaded lists.
    #[must_use]
    pub fn selected_item(&self) -> Option<&CatalogItem> {
        let id = self.route().item_id;
        match self.section() {
            Section::Search => resolve_selection(id, &[self.search_results()]),
            section => {
                let lists: Vec<&[CatalogItem]> = section
                    .rows()
                    .iter()
                    .map(|row| self.all_items(*row))
                    .collect();
                resolve_selection(id, &lists)
            }
        }
    }

    /// Item under the focus cursor.
    #[must_use]
    pub fn focused_item(&self) -> Option<&CatalogItem> {
        match self.section() {
            Section::Search => self.search_results().get(self.focus_card),
            section => {
                let row = section.rows().get(self.focus_row)?;
                self.visible(*row).get(self.focus_card)
            }
        }
    }

    /// Fraction of the overlay morph elapsed at `now`.
    #[must_use]
    pub fn overlay_progress(&self, now: Instant) -> f64 {
        if self.paging.transition.is_zero() {
            return 1.0;
        }
        self.overlay_opened.map_or(1.0, |opened| {
            let elapsed = now.saturating_duration_since(opened);
            (elapsed.as_secs_f64() / OVERLAY_MORPH.as_secs_f64()).min(1.0)
        })
    }

    /// Number of cards in the focused row or grid.
    fn focus_len(&self) -> usize {
        match self.section() {
            Section::Search => self.search_results().len(),
            section => section
                .rows()
                .get(self.focus_row)
                .map_or(0, |row| self.visible(*row).len()),
        }
    }

    fn clamp_focus(&mut self) {
        let rows = self.section().rows().len();
        self.focus_row = self.focus_row.min(rows.saturating_sub(1));
        self.focus_card = self.focus_card.min(self.focus_len().saturating_sub(1));
    }

    /// Moves focus to the previous card.
    pub const fn move_left(&mut self) {
        self.focus_card = self.focus_card.saturating_sub(1);
    }

    /// Moves focus to the next card.
    pub fn move_right(&mut self) {
        self.focus_card = self.focus_card.saturating_add(1);
        self.clamp_focus();
    }

    /// Moves focus to the row above (or the grid line above).
    pub fn move_up(&mut self) {
        match self.section() {
            Section::Search => {
                self.focus_card = self.focus_card.saturating_sub(self.paging.search_columns);
            }
            _ => self.focus_row = self.focus_row.saturating_sub(1),
        }
        self.clamp_focus();
    }

    /// Moves focus to the row below (or the grid line below).
    pub fn move_down(&mut self) {
        match self.section() {
            Section::Search => {
                let next = self.focus_card.saturating_add(self.paging.search_columns);
                if next < self.search_results().len() {
                    self.focus_card = next;
                }
            }
            _ => self.focus_row = self.focus_row.saturating_add(1),
        }
        self.clamp_focus();
    }

    /// Advances the focused row by one page.
    pub fn advance_focused(&mut self, now: Instant) -> AdvanceOutcome {
        let Some(&row) = self.section().rows().get(self.focus_row) else {
            return AdvanceOutcome::NotLoaded;
        };
        let outcome = self.carousel.advance(row);
        if let AdvanceOutcome::Advanced { from, .. } = outcome {
            if self.paging.transition.is_zero() {
                self.carousel.acknowledge_transition_complete(row);
            } else {
                self.transitions
                    .insert(row, Transition::new(from, now, self.paging.transition));
            }
        }
        self.clamp_focus();
        outcome
    }

    /// Opens the detail overlay for the focused item.
    pub fn open_focused(&mut self, now: Instant) -> bool {
        let Some(id) = self.focused_item().map(|item| item.id) else {
            return false;
        };
        let opened = self.navigator.open(id);
        self.sync_route(now);
        opened
    }

    /// Closes the overlay, or goes back when it is closed.
    pub fn close_or_back(&mut self, now: Instant) {
        if !self.navigator.close() {
            self.navigator.back();
        }
        self.sync_route(now);
    }

    /// History forward.
    pub fn forward(&mut self, now: Instant) {
        self.navigator.forward();
        self.sync_route(now);
    }

    /// Navigates to the root of `section`.
    pub fn show_section(&mut self, section: Section, now: Instant) {
        self.navigator.navigate(Route::for_section(section));
        self.sync_route(now);
    }

    /// Enters search input mode, prefilled with the current keyword.
    pub fn begin_search(&mut self) {
        self.search_input = self.route().keyword.clone().unwrap_or_default();
        self.input_mode = InputMode::Search;
    }

    /// Appends a character to the search input.
    pub fn search_push(&mut self, c: char) {
        self.search_input.push(c);
    }

    /// Removes the last character of the search input.
    pub fn search_pop(&mut self) {
        self.search_input.pop();
    }

    /// Leaves search input mode without searching.
    pub fn cancel_search(&mut self) {
        self.search_input.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Navigates to the search route for the typed keyword.
    pub fn submit_search(&mut self, now: Instant) {
        self.input_mode = InputMode::Normal;
        let keyword = self.search_input.trim();
        if keyword.is_empty() {
            return;
        }
        self.navigator.navigate(Route::search(keyword));
        self.sync_route(now);
    }
}
