//! TMDB API response types and request parameters.

use serde::Deserialize;

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "ko-KR";

/// Default region filter for movie lists (ISO 3166-1).
pub const DEFAULT_REGION: &str = "kr";

// --- Paged responses ---

/// Generic paged list response shared by every list and search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    /// Current page number.
    pub page: u32,
    /// Results on this page.
    pub results: Vec<T>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
    /// Release window (only `movie/now_playing` and `movie/upcoming`).
    #[serde(default)]
    pub dates: Option<TmdbDateRange>,
}

/// Release date window attached to `movie/now_playing`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDateRange {
    /// Latest release date (YYYY-MM-DD).
    pub maximum: String,
    /// Earliest release date (YYYY-MM-DD).
    pub minimum: String,
}

/// Response from the `movie/*` list endpoints.
pub type TmdbMovieListResponse = TmdbPage<TmdbMovie>;

/// Response from the `tv/*` list endpoints.
pub type TmdbTvListResponse = TmdbPage<TmdbTvShow>;

/// Response from `search/multi`.
pub type TmdbSearchMultiResponse = TmdbPage<TmdbMultiResult>;

// --- Items ---

/// A movie entry in a list or search response.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
}

/// A TV series entry in a list or search response.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvShow {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// First air date (YYYY-MM-DD).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
}

/// A person entry in a multi-search response.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPerson {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
}

/// A single `search/multi` result, tagged by `media_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum TmdbMultiResult {
    /// `media_type = "movie"`.
    Movie(TmdbMovie),
    /// `media_type = "tv"`.
    Tv(TmdbTvShow),
    /// `media_type = "person"`.
    Person(TmdbPerson),
    /// Any media type this client does not model.
    #[serde(other)]
    Unknown,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- Endpoints ---

/// Movie list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieList {
    /// `movie/now_playing`.
    NowPlaying,
    /// `movie/popular`.
    Popular,
    /// `movie/top_rated`.
    TopRated,
}

impl MovieList {
    /// Returns the endpoint path relative to the API base.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::NowPlaying => "movie/now_playing",
            Self::Popular => "movie/popular",
            Self::TopRated => "movie/top_rated",
        }
    }
}

/// TV list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvList {
    /// `tv/popular`.
    Popular,
    /// `tv/top_rated`.
    TopRated,
    /// `tv/on_the_air`.
    OnTheAir,
}

impl TvList {
    /// Returns the endpoint path relative to the API base.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Popular => "tv/popular",
            Self::TopRated => "tv/top_rated",
            Self::OnTheAir => "tv/on_the_air",
        }
    }
}

// --- Parameters ---

/// Parameters for the list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Response language (default: "ko-KR").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Region filter; only sent to movie lists.
    pub region: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            region: Some(String::from(DEFAULT_REGION)),
        }
    }
}

impl ListParams {
    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets or clears the region filter.
    #[must_use]
    pub fn region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }
}

/// Parameters for `search/multi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMultiParams {
    /// Search keyword (required).
    pub query: String,
    /// Response language (default: "ko-KR").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMultiParams {
    /// Creates new search params with the given keyword.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_multi_result_tags() {
        // Arrange
        let json = r#"[
            {"media_type":"movie","id":550,"title":"Fight Club","overview":"x","backdrop_path":"/a.jpg"},
            {"media_type":"tv","id":1399,"name":"Game of Thrones","backdrop_path":null},
            {"media_type":"person","id":287,"name":"Brad Pitt"},
            {"media_type":"collection","id":1}
        ]"#;

        // Act
        let results: Vec<TmdbMultiResult> = serde_json::from_str(json).unwrap();

        // Assert
        assert!(matches!(&results[0], TmdbMultiResult::Movie(m) if m.id == 550));
        assert!(matches!(&results[1], TmdbMultiResult::Tv(t) if t.backdrop_path.is_none()));
        assert!(matches!(&results[2], TmdbMultiResult::Person(p) if p.name == "Brad Pitt"));
        assert!(matches!(results[3], TmdbMultiResult::Unknown));
    }

    #[test]
    fn test_list_params_defaults() {
        // Arrange & Act
        let params = ListParams::default();

        // Assert
        assert_eq!(params.language, "ko-KR");
        assert_eq!(params.page, 1);
        assert_eq!(params.region.as_deref(), Some("kr"));
    }

    #[test]
    fn test_endpoint_paths() {
        // Arrange & Act & Assert
        assert_eq!(MovieList::NowPlaying.path(), "movie/now_playing");
        assert_eq!(MovieList::TopRated.path(), "movie/top_rated");
        assert_eq!(TvList::OnTheAir.path(), "tv/on_the_air");
    }
}
