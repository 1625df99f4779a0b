//! Browser TUI main loop.
//!
//! Uses `ratatui` + `crossterm` for rendering. The terminal loop runs on a
//! blocking thread; fetches run as tasks on the runtime and report back over
//! an unbounded channel that is drained between frames.

/// Browser state types.
pub mod state;
/// Browser rendering.
pub mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use nomflix_api::tmdb::{CatalogApi, ListParams, SearchMultiParams};
use nomflix_core::carousel::AdvanceOutcome;
use nomflix_core::catalog::{CatalogItem, CatalogPage};
use nomflix_core::route::Route;
use nomflix_core::section::{RowSource, Section};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use self::state::{BrowserState, FetchOutcome, FetchRequest, InputMode, Paging};
use self::ui::Artwork;

/// Event poll timeout; bounds the animation frame interval.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Settings for one browser session.
#[derive(Debug)]
pub struct BrowseOptions {
    /// Route opened at start.
    pub initial: Route,
    /// Carousel paging.
    pub paging: Paging,
    /// Banner and detail image URLs.
    pub artwork: Artwork,
    /// Locale and page of list requests.
    pub list_params: ListParams,
}

/// Spawns fetches on the runtime.
struct Fetcher<C> {
    client: Arc<C>,
    handle: Handle,
    list_params: ListParams,
    tx: UnboundedSender<FetchOutcome>,
}

impl<C: CatalogApi + Sync + 'static> Fetcher<C> {
    fn spawn(&self, request: FetchRequest) {
        self.handle.spawn(fetch(
            Arc::clone(&self.client),
            self.list_params.clone(),
            request,
            self.tx.clone(),
        ));
    }
}

/// Runs one fetch and reports its outcome.
async fn fetch<C: CatalogApi>(
    client: Arc<C>,
    params: ListParams,
    request: FetchRequest,
    tx: UnboundedSender<FetchOutcome>,
) {
    let outcome = match request {
        FetchRequest::Row(row) => {
            let page = match row.source() {
                RowSource::Movie(list) => client
                    .movie_list(list, &params)
                    .await
                    .map(CatalogPage::from),
                RowSource::Tv(list) => client.tv_list(list, &params).await.map(CatalogPage::from),
            };
            FetchOutcome::Row {
                row,
                result: into_items(page),
            }
        }
        FetchRequest::Search { keyword, token } => {
            let search = SearchMultiParams::new(keyword).language(params.language);
            let page = client.search_multi(&search).await.map(CatalogPage::from);
            FetchOutcome::Search {
                token,
                result: into_items(page),
            }
        }
    };
    if tx.send(outcome).is_err() {
        tracing::debug!("browser closed before fetch completed");
    }
}

fn into_items(page: Result<CatalogPage>) -> Result<Vec<CatalogItem>, String> {
    page.map(|page| page.results)
        .map_err(|err| format!("{err:#}"))
}

/// Runs the browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if the configured offsets are invalid, or terminal setup
/// or event handling fails.
pub async fn run_browser<C>(client: Arc<C>, options: BrowseOptions) -> Result<()>
where
    C: CatalogApi + Sync + 'static,
{
    let state = BrowserState::new(options.initial, options.paging, Instant::now())
        .context("invalid carousel configuration")?;
    let (tx, rx) = mpsc::unbounded_channel();
    let fetcher = Fetcher {
        client,
        handle: Handle::current(),
        list_params: options.list_params,
        tx,
    };
    let artwork = options.artwork;

    tokio::task::spawn_blocking(move || run_terminal(state, &artwork, &fetcher, rx))
        .await
        .context("browser thread panicked")?
}

/// Sets up the terminal, runs the event loop and restores the terminal.
fn run_terminal<C: CatalogApi + Sync + 'static>(
    mut state: BrowserState,
    artwork: &Artwork,
    fetcher: &Fetcher<C>,
    mut rx: UnboundedReceiver<FetchOutcome>,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, artwork, fetcher, &mut rx);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
fn run_event_loop<C: CatalogApi + Sync + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    artwork: &Artwork,
    fetcher: &Fetcher<C>,
    rx: &mut UnboundedReceiver<FetchOutcome>,
) -> Result<()> {
    loop {
        for request in state.take_requests() {
            tracing::debug!(?request, "spawning fetch");
            fetcher.spawn(request);
        }
        while let Ok(outcome) = rx.try_recv() {
            state.apply(outcome);
        }

        let now = Instant::now();
        state.tick(now);
        terminal
            .draw(|frame| ui::draw(frame, state, artwork, now))
            .context("failed to draw TUI")?;

        if event::poll(FRAME_INTERVAL).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            match state.input_mode {
                InputMode::Search => handle_search_input(state, key.code),
                InputMode::Normal => {
                    if handle_normal_input(state, key.code, key.modifiers) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Handles key input in search mode.
fn handle_search_input(state: &mut BrowserState, key: KeyCode) {
    match key {
        KeyCode::Esc => state.cancel_search(),
        KeyCode::Enter => state.submit_search(Instant::now()),
        KeyCode::Backspace => state.search_pop(),
        KeyCode::Char(c) => state.search_push(c),
        _ => {}
    }
}

/// Handles key input in normal mode. Returns `true` to exit.
fn handle_normal_input(state: &mut BrowserState, key: KeyCode, modifiers: KeyModifiers) -> bool {
    let now = Instant::now();
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Left | KeyCode::Char('h') => state.move_left(),
        KeyCode::Right | KeyCode::Char('l') => state.move_right(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char(' ' | ']') => {
            if let AdvanceOutcome::Advanced { from, to } = state.advance_focused(now) {
                tracing::debug!(from, to, "page advanced");
            }
        }
        KeyCode::Enter => {
            state.open_focused(now);
        }
        KeyCode::Esc | KeyCode::Backspace => state.close_or_back(now),
        KeyCode::Char('f') => state.forward(now),
        KeyCode::Char('1') => state.show_section(Section::Movies, now),
        KeyCode::Char('2') => state.show_section(Section::Tv, now),
        KeyCode::Char('/') => state.begin_search(),
        KeyCode::Char('o') => open_tmdb_page(state),
        _ => {}
    }
    false
}

/// Opens the TMDB page of the selected item, or of the focused one.
fn open_tmdb_page(state: &BrowserState) {
    let Some(item) = state.selected_item().or_else(|| state.focused_item()) else {
        return;
    };
    let url = item.site_url();
    if let Err(err) = open::that(&url) {
        tracing::warn!(%url, %err, "failed to open browser");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::panic)]

    use nomflix_api::tmdb::{
        MovieList, TmdbMovie, TmdbMovieListResponse, TmdbMultiResult, TmdbPage, TmdbPerson,
        TmdbSearchMultiResponse, TmdbTvListResponse, TmdbTvShow, TvList,
    };
    use nomflix_core::catalog::MediaKind;
    use nomflix_core::fetch::RequestTracker;
    use nomflix_core::section::RowId;

    use super::*;

    /// In-memory catalog; `tv/on_the_air` always fails.
    struct StubCatalog;

    fn movie(id: u64, title: String) -> TmdbMovie {
        TmdbMovie {
            id,
            title,
            original_title: None,
            overview: Some(String::from("overview")),
            backdrop_path: Some(format!("/{id}.jpg")),
            poster_path: None,
            release_date: None,
            vote_average: 0.0,
            popularity: 0.0,
        }
    }

    fn show(id: u64, name: &str) -> TmdbTvShow {
        TmdbTvShow {
            id,
            name: String::from(name),
            original_name: None,
            overview: None,
            backdrop_path: None,
            poster_path: None,
            first_air_date: None,
            vote_average: 0.0,
            popularity: 0.0,
        }
    }

    fn page<T>(results: Vec<T>) -> TmdbPage<T> {
        TmdbPage {
            page: 1,
            total_pages: 1,
            total_results: u32::try_from(results.len()).unwrap(),
            results,
            dates: None,
        }
    }

    impl CatalogApi for StubCatalog {
        async fn movie_list(
            &self,
            list: MovieList,
            params: &ListParams,
        ) -> Result<TmdbMovieListResponse> {
            let id = match list {
                MovieList::NowPlaying => 1,
                MovieList::Popular => 2,
                MovieList::TopRated => 3,
            };
            Ok(page(vec![movie(id, format!("{list:?} {}", params.language))]))
        }

        async fn tv_list(&self, list: TvList, _params: &ListParams) -> Result<TmdbTvListResponse> {
            if list == TvList::OnTheAir {
                return Err(anyhow::anyhow!("HTTP 500").context("tv/on_the_air request failed"));
            }
            Ok(page(vec![show(10, "popular show"), show(11, "another show")]))
        }

        async fn search_multi(&self, params: &SearchMultiParams) -> Result<TmdbSearchMultiResponse> {
            Ok(page(vec![
                TmdbMultiResult::Movie(movie(550, format!("{} {}", params.query, params.language))),
                TmdbMultiResult::Person(TmdbPerson {
                    id: 287,
                    name: String::from("person"),
                }),
                TmdbMultiResult::Tv(show(1399, "show")),
            ]))
        }
    }

    fn stub_fetcher(tx: UnboundedSender<FetchOutcome>) -> Fetcher<StubCatalog> {
        Fetcher {
            client: Arc::new(StubCatalog),
            handle: Handle::current(),
            list_params: ListParams::default().language("en-US"),
            tx,
        }
    }

    #[tokio::test]
    async fn test_movie_row_fetch_reports_items() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let fetcher = stub_fetcher(tx);

        // Act
        fetcher.spawn(FetchRequest::Row(RowId::TopRatedMovies));
        let outcome = rx.recv().await.unwrap();

        // Assert
        let FetchOutcome::Row { row, result } = outcome else {
            panic!("expected row outcome, got {outcome:?}");
        };
        assert_eq!(row, RowId::TopRatedMovies);
        let items = result.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 3);
        assert_eq!(items[0].title, "TopRated en-US");
        assert_eq!(items[0].media_kind, MediaKind::Movie);
        assert_eq!(items[0].backdrop_path.as_deref(), Some("/3.jpg"));
    }

    #[tokio::test]
    async fn test_tv_row_fetch_reports_items_and_errors() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let fetcher = stub_fetcher(tx);

        // Act
        fetcher.spawn(FetchRequest::Row(RowId::PopularTv));
        let loaded = rx.recv().await.unwrap();
        fetcher.spawn(FetchRequest::Row(RowId::OnTheAirTv));
        let failed = rx.recv().await.unwrap();

        // Assert
        let FetchOutcome::Row { row, result } = loaded else {
            panic!("expected row outcome, got {loaded:?}");
        };
        assert_eq!(row, RowId::PopularTv);
        let items = result.unwrap();
        assert_eq!(
            items.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![10, 11]
        );
        assert!(items.iter().all(|item| item.media_kind == MediaKind::Tv));

        let FetchOutcome::Row { row, result } = failed else {
            panic!("expected row outcome, got {failed:?}");
        };
        assert_eq!(row, RowId::OnTheAirTv);
        assert_eq!(result.unwrap_err(), "tv/on_the_air request failed: HTTP 500");
    }

    #[tokio::test]
    async fn test_search_fetch_keeps_token_and_language() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let fetcher = stub_fetcher(tx);
        let mut tracker = RequestTracker::new();
        let _stale = tracker.issue();
        let token = tracker.issue();

        // Act
        fetcher.spawn(FetchRequest::Search {
            keyword: String::from("fight club"),
            token,
        });
        let outcome = rx.recv().await.unwrap();

        // Assert
        let FetchOutcome::Search {
            token: returned,
            result,
        } = outcome
        else {
            panic!("expected search outcome, got {outcome:?}");
        };
        assert_eq!(returned, token);
        let items = result.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "fight club en-US");
        assert_eq!(items[1].id, 1399);
        assert_eq!(items[1].media_kind, MediaKind::Tv);
    }
}
