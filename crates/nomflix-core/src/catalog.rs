//! Catalog items converted from TMDB responses.

use std::fmt;

use nomflix_api::tmdb::{
    TmdbMovie, TmdbMovieListResponse, TmdbMultiResult, TmdbSearchMultiResponse,
    TmdbTvListResponse, TmdbTvShow,
};

/// Public TMDB site used for "open in browser".
const TMDB_SITE_URL: &str = "https://www.themoviedb.org";

/// Kind of media an item refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// A movie.
    Movie,
    /// A TV series.
    Tv,
}

impl MediaKind {
    /// Returns the TMDB media type tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One displayable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// TMDB ID, unique within a list.
    pub id: u64,
    /// Movie title or TV series name.
    pub title: String,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Overview text (empty when TMDB has none).
    pub overview: String,
    /// Movie or TV.
    pub media_kind: MediaKind,
}

impl CatalogItem {
    /// Identity key shared by the row card and the opened detail card.
    #[must_use]
    pub fn layout_key(&self) -> String {
        self.id.to_string()
    }

    /// TMDB web page for this item.
    #[must_use]
    pub fn site_url(&self) -> String {
        format!("{TMDB_SITE_URL}/{}/{}", self.media_kind, self.id)
    }

    /// Converts a multi-search result; people and unknown kinds are dropped.
    #[must_use]
    pub fn from_multi(result: TmdbMultiResult) -> Option<Self> {
        match result {
            TmdbMultiResult::Movie(movie) => Some(Self::from(movie)),
            TmdbMultiResult::Tv(show) => Some(Self::from(show)),
            TmdbMultiResult::Person(_) | TmdbMultiResult::Unknown => None,
        }
    }
}

impl From<TmdbMovie> for CatalogItem {
    fn from(movie: TmdbMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            backdrop_path: movie.backdrop_path,
            overview: movie.overview.unwrap_or_default(),
            media_kind: MediaKind::Movie,
        }
    }
}

impl From<TmdbTvShow> for CatalogItem {
    fn from(show: TmdbTvShow) -> Self {
        Self {
            id: show.id,
            title: show.name,
            backdrop_path: show.backdrop_path,
            overview: show.overview.unwrap_or_default(),
            media_kind: MediaKind::Tv,
        }
    }
}

/// An ordered page of catalog items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    /// Page number.
    pub page: u32,
    /// Items in response order.
    pub results: Vec<CatalogItem>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results on the server.
    pub total_results: u32,
}

impl From<TmdbMovieListResponse> for CatalogPage {
    fn from(response: TmdbMovieListResponse) -> Self {
        Self {
            page: response.page,
            results: response.results.into_iter().map(CatalogItem::from).collect(),
            total_pages: response.total_pages,
            total_results: response.total_results,
        }
    }
}

impl From<TmdbTvListResponse> for CatalogPage {
    fn from(response: TmdbTvListResponse) -> Self {
        Self {
            page: response.page,
            results: response.results.into_iter().map(CatalogItem::from).collect(),
            total_pages: response.total_pages,
            total_results: response.total_results,
        }
    }
}

impl From<TmdbSearchMultiResponse> for CatalogPage {
    fn from(response: TmdbSearchMultiResponse) -> Self {
        Self {
            page: response.page,
            results: response
                .results
                .into_iter()
                .filter_map(CatalogItem::from_multi)
                .collect(),
            total_pages: response.total_pages,
            total_results: response.total_results,
        }
    }
}
