//! `TmdbClient` - TMDB API client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::CatalogApi;
use super::rate_limiter::RateLimiter;
use super::types::{
    ListParams, MovieList, SearchMultiParams, TmdbErrorResponse, TmdbMovieListResponse,
    TmdbSearchMultiResponse, TmdbTvListResponse, TvList,
};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// API credential.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token, sent as `Authorization: Bearer`.
    BearerToken(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
        }
    }
}

/// TMDB API client.
#[derive(Debug)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API credential.
    credential: Credential,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    credential: Option<Credential>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            credential: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Authenticates with a v3 API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credential = Some(Credential::ApiKey(key.into()));
        self
    }

    /// Authenticates with a v4 bearer token.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(Credential::BearerToken(token.into()));
        self
    }

    /// Sets the credential directly.
    #[must_use]
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - no credential is set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credential = self
            .credential
            .context("api_key or api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(RateLimiter::default_interval, RateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credential,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a GET request with the credential, query params, and rate limiting.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all, fields(path = %path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut retries = 0u32;
        loop {
            let mut builder = self.http_client.get(url.clone()).query(query);
            builder = match &self.credential {
                Credential::ApiKey(key) => builder.query(&[("api_key", key.as_str())]),
                Credential::BearerToken(token) => builder.bearer_auth(token),
            };
            let request = builder
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(params = ?query, "TMDB API request");

            let result = self.http_client.execute(request).await;
            let response = result.with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            let parsed =
                raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
            return Ok(parsed);
        }
    }
}

/// Builds the common list query.
fn list_query(params: &ListParams, with_region: bool) -> Vec<(&'static str, String)> {
    let mut query: Vec<(&str, String)> = vec![
        ("language", params.language.clone()),
        ("page", params.page.to_string()),
    ];
    if with_region && let Some(ref region) = params.region {
        query.push(("region", region.clone()));
    }
    query
}

impl CatalogApi for TmdbClient {
    #[instrument(skip_all, fields(list = ?list))]
    async fn movie_list(
        &self,
        list: MovieList,
        params: &ListParams,
    ) -> Result<TmdbMovieListResponse> {
        let query = list_query(params, true);
        self.get_json(list.path(), &query).await
    }

    #[instrument(skip_all, fields(list = ?list))]
    async fn tv_list(&self, list: TvList, params: &ListParams) -> Result<TmdbTvListResponse> {
        let query = list_query(params, false);
        self.get_json(list.path(), &query).await
    }

    #[instrument(skip_all)]
    async fn search_multi(&self, params: &SearchMultiParams) -> Result<TmdbSearchMultiResponse> {
        let query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        self.get_json("search/multi", &query).await
    }
}
