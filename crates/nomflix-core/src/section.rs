//! Sections (top-level views) and the named rows they contain.

use std::fmt;
use std::str::FromStr;

use nomflix_api::tmdb::{MovieList, TvList};

use crate::banner::OverviewStyle;

/// Default items per page in the movies section.
pub const DEFAULT_MOVIE_OFFSET: usize = 6;

/// Default items per page in the TV section.
pub const DEFAULT_TV_OFFSET: usize = 5;

/// Default column count of the search results grid.
pub const DEFAULT_SEARCH_COLUMNS: usize = 5;

/// A top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Movie rows (`/`).
    Movies,
    /// TV rows (`/tv`).
    Tv,
    /// Multi-search grid (`/search`).
    Search,
}

impl Section {
    /// Rows shown in this section, in selection priority order.
    #[must_use]
    pub const fn rows(self) -> &'static [RowId] {
        match self {
            Self::Movies => &[
                RowId::NowPlayingMovies,
                RowId::PopularMovies,
                RowId::TopRatedMovies,
            ],
            Self::Tv => &[RowId::PopularTv, RowId::TopRatedTv, RowId::OnTheAirTv],
            Self::Search => &[],
        }
    }

    /// Row whose first item feeds the banner.
    #[must_use]
    pub const fn banner_row(self) -> Option<RowId> {
        match self {
            Self::Movies => Some(RowId::PopularMovies),
            Self::Tv => Some(RowId::TopRatedTv),
            Self::Search => None,
        }
    }

    /// How the banner overview is shortened.
    #[must_use]
    pub const fn overview_style(self) -> OverviewStyle {
        match self {
            Self::Movies => OverviewStyle::Abbreviated,
            Self::Tv | Self::Search => OverviewStyle::Full,
        }
    }

    /// Path segment that prefixes a detail id.
    #[must_use]
    pub const fn detail_segment(self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Tv => "tv",
            Self::Search => "search",
        }
    }

    /// Header label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movies => "Home",
            Self::Tv => "Tv shows",
            Self::Search => "Search",
        }
    }
}

/// Where a row's data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    /// A movie list endpoint.
    Movie(MovieList),
    /// A TV list endpoint.
    Tv(TvList),
}

/// A named, independently paged row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    /// Movies in theaters.
    NowPlayingMovies,
    /// Popular movies.
    PopularMovies,
    /// Top rated movies.
    TopRatedMovies,
    /// Popular TV.
    PopularTv,
    /// Top rated TV.
    TopRatedTv,
    /// TV with an episode airing in the next week.
    OnTheAirTv,
}

impl RowId {
    /// All rows.
    pub const ALL: [Self; 6] = [
        Self::NowPlayingMovies,
        Self::PopularMovies,
        Self::TopRatedMovies,
        Self::PopularTv,
        Self::TopRatedTv,
        Self::OnTheAirTv,
    ];

    /// Display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::NowPlayingMovies => "Now playing",
            Self::PopularMovies => "Trending now",
            Self::TopRatedMovies => "Top rated movies",
            Self::PopularTv => "Trending TV",
            Self::TopRatedTv => "Critically acclaimed TV",
            Self::OnTheAirTv => "New episodes every week",
        }
    }

    /// Kebab-case name used on the command line.
    #[must_use]
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::NowPlayingMovies => "now-playing",
            Self::PopularMovies => "popular-movies",
            Self::TopRatedMovies => "top-rated-movies",
            Self::PopularTv => "popular-tv",
            Self::TopRatedTv => "top-rated-tv",
            Self::OnTheAirTv => "on-the-air-tv",
        }
    }

    /// Section the row belongs to.
    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Self::NowPlayingMovies | Self::PopularMovies | Self::TopRatedMovies => Section::Movies,
            Self::PopularTv | Self::TopRatedTv | Self::OnTheAirTv => Section::Tv,
        }
    }

    /// Endpoint backing the row.
    #[must_use]
    pub const fn source(self) -> RowSource {
        match self {
            Self::NowPlayingMovies => RowSource::Movie(MovieList::NowPlaying),
            Self::PopularMovies => RowSource::Movie(MovieList::Popular),
            Self::TopRatedMovies => RowSource::Movie(MovieList::TopRated),
            Self::PopularTv => RowSource::Tv(TvList::Popular),
            Self::TopRatedTv => RowSource::Tv(TvList::TopRated),
            Self::OnTheAirTv => RowSource::Tv(TvList::OnTheAir),
        }
    }

    /// Number of leading items hidden from the row. Movies hide the banner
    /// item; the top-rated TV row hides the banner item and the one after it.
    #[must_use]
    pub const fn leading_skip(self) -> usize {
        match self {
            Self::PopularMovies => 1,
            Self::TopRatedTv => 2,
            Self::NowPlayingMovies | Self::TopRatedMovies | Self::PopularTv | Self::OnTheAirTv => 0,
        }
    }

    /// The part of `items` the row pages through.
    #[must_use]
    pub fn pageable<T>(self, items: &[T]) -> &[T] {
        items.get(self.leading_skip()..).unwrap_or(&[])
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

/// Unrecognized row name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRowError(pub String);

impl fmt::Display for UnknownRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = RowId::ALL.iter().map(|row| row.cli_name()).collect();
        write!(
            f,
            "unknown row '{}' (expected one of: {})",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for UnknownRowError {}

impl FromStr for RowId {
    type Err = UnknownRowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|row| row.cli_name() == s)
            .ok_or_else(|| UnknownRowError(String::from(s)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_cli_names_round_trip() {
        // Arrange & Act & Assert
        for row in RowId::ALL {
            assert_eq!(row.cli_name().parse::<RowId>().unwrap(), row);
        }
    }

    #[test]
    fn test_unknown_row_lists_choices() {
        // Arrange & Act
        let err = "upcoming".parse::<RowId>().unwrap_err();

        // Assert
        assert!(err.to_string().contains("upcoming"));
        assert!(err.to_string().contains("on-the-air-tv"));
    }

    #[test]
    fn test_banner_rows_skip_leading_items() {
        // Arrange
        let items = [1, 2, 3];

        // Act & Assert
        assert_eq!(RowId::PopularMovies.pageable(&items), &[2, 3]);
        assert_eq!(RowId::NowPlayingMovies.pageable(&items), &[1, 2, 3]);
        assert_eq!(RowId::TopRatedTv.pageable(&items), &[3]);
        assert_eq!(RowId::PopularTv.pageable(&items), &[1, 2, 3]);
        assert!(RowId::TopRatedTv.pageable(&items[..1]).is_empty());
        assert!(RowId::TopRatedTv.pageable::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_rows_belong_to_their_section() {
        // Arrange & Act & Assert
        for section in [Section::Movies, Section::Tv] {
            for row in section.rows() {
                assert_eq!(row.section(), section);
            }
        }
        assert!(Section::Search.rows().is_empty());
    }
}
