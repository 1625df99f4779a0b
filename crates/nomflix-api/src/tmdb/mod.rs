//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 list and search endpoints.

mod api;
mod client;
mod rate_limiter;
mod types;

pub use api::{CatalogApi, LocalCatalogApi};
pub use client::{Credential, DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
pub use types::{
    DEFAULT_LANGUAGE, DEFAULT_REGION, ListParams, MovieList, SearchMultiParams, TmdbDateRange,
    TmdbMovie, TmdbMovieListResponse, TmdbMultiResult, TmdbPage, TmdbPerson,
    TmdbSearchMultiResponse, TmdbTvListResponse, TmdbTvShow, TvList,
};
