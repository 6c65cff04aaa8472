//! anime-db API client with a time-bounded response cache.

use super::error::ApiError;
use super::types::{encode_query, AnimeQuery, GenreEntry, QueryParams};
use crate::cache::ResponseCache;
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use shared::config::{ApiConfig, Config, EndpointsConfig};
use shared::{AnimePage, AnimeRecord};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

const KEY_HEADER: &str = "x-rapidapi-key";
const HOST_HEADER: &str = "x-rapidapi-host";

/// anime-db API client
///
/// Requests take `&self`, so several may be in flight at once; the cache lock
/// is only held for lookups and inserts, never across a network call.
pub struct ApiClient {
    /// HTTP client
    client: Client,
    /// Base URL for the API
    base_url: String,
    /// Value of the host header
    host: String,
    /// Endpoint paths
    endpoints: EndpointsConfig,
    /// API key, if one is configured
    credential: Option<String>,
    /// Responses keyed by full request URL
    cache: Mutex<ResponseCache>,
}

impl ApiClient {
    /// Create a new client without a credential
    pub fn new(api: &ApiConfig, timeout: Duration, cache_expiry: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("anime-hub/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            host: api.host.clone(),
            endpoints: api.endpoints.clone(),
            credential: None,
            cache: Mutex::new(ResponseCache::new(cache_expiry)),
        })
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api, config.request_timeout(), config.cache_expiry())
    }

    /// Replace the credential
    ///
    /// Cached responses were fetched under the previous credential and are
    /// dropped.
    pub fn set_credential(&mut self, credential: Option<String>) {
        self.credential = credential.filter(|key| !key.is_empty());
        self.clear_cache();
        info!(configured = self.credential.is_some(), "API credential updated");
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of responses currently held in the cache
    pub fn cached_responses(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Canonical URL for a request; also its cache key
    pub fn request_url(&self, endpoint: &str, params: &QueryParams) -> String {
        let query = encode_query(params);
        if query.is_empty() {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.base_url, endpoint, query)
        }
    }

    /// GET `endpoint` with `params`, returning the JSON body
    pub async fn request(&self, endpoint: &str, params: &QueryParams) -> Result<Value, ApiError> {
        let credential = self.credential.as_deref().ok_or(ApiError::CredentialMissing)?;

        let url = self.request_url(endpoint, params);

        let cached = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&url);
        if let Some(value) = cached {
            return Ok(value);
        }

        debug!(url = %url, "Making API request");

        let response = self
            .client
            .get(&url)
            .header(KEY_HEADER, credential)
            .header(HOST_HEADER, &self.host)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Request error");
                ApiError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Request failed");
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to parse response");
            ApiError::MalformedResponse(e)
        })?;

        debug!(url = %url, "Request successful");
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(url, value.clone());

        Ok(value)
    }

    /// Fetch one page of the anime list
    pub async fn fetch_anime(&self, query: &AnimeQuery) -> Result<AnimePage, ApiError> {
        info!(page = query.page, size = query.size, "Fetching anime page");
        let value = self.request(&self.endpoints.anime, &query.to_params()).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the genre names offered by the catalog
    ///
    /// A payload that is not a list yields no genres; unrecognised entries are
    /// skipped.
    pub async fn fetch_genres(&self) -> Result<Vec<String>, ApiError> {
        info!("Fetching genres");
        let value = self.request(&self.endpoints.genres, &QueryParams::new()).await?;

        let Value::Array(items) = value else {
            warn!("Genre response is not a list");
            return Ok(Vec::new());
        };

        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<GenreEntry>(item).ok())
            .map(GenreEntry::into_name)
            .collect())
    }

    /// Fetch a single anime by catalog id
    pub async fn fetch_by_id(&self, id: &str) -> Result<AnimeRecord, ApiError> {
        debug!(id = id, "Fetching anime by id");
        let endpoint = format!("{}/{}", self.endpoints.by_id, urlencoding::encode(id));
        let value = self.request(&endpoint, &QueryParams::new()).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the anime holding a given ranking
    pub async fn fetch_by_ranking(&self, rank: u32) -> Result<AnimeRecord, ApiError> {
        debug!(rank = rank, "Fetching anime by ranking");
        let endpoint = format!("{}/{}", self.endpoints.by_ranking, rank);
        let value = self.request(&endpoint, &QueryParams::new()).await?;
        Ok(serde_json::from_value(value)?)
    }
}
