//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    ListParams, MovieList, SearchMultiParams, TmdbMovieListResponse, TmdbSearchMultiResponse,
    TmdbTvListResponse, TvList,
};

/// Media catalog API trait.
///
/// Abstracts the list and search operations so the browser can be driven
/// by a stub in tests. Uses `trait_variant::make` to generate a
/// `Send`-bound async trait; fetches are spawned onto the runtime.
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Fetches one page of a movie list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_list(&self, list: MovieList, params: &ListParams)
    -> Result<TmdbMovieListResponse>;

    /// Fetches one page of a TV list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_list(&self, list: TvList, params: &ListParams) -> Result<TmdbTvListResponse>;

    /// Searches movies, TV series and people in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_multi(&self, params: &SearchMultiParams) -> Result<TmdbSearchMultiResponse>;
}
