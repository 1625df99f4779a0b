//! Catalog client library for nomflix.
//!
//! Provides the TMDB API v3 client used to fetch movie/TV lists and
//! multi-search results, plus the image path resolver.

/// TMDB image URL construction.
pub mod image;

/// TMDB API client.
pub mod tmdb;
