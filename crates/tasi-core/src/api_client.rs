//! SAHMK market-data client.
//!
//! Every call goes through [`SahmkClient::get`]: a cached GET that never
//! fails the caller. Failures are logged, remembered for the page envelope
//! and turned into `None`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cache::{cache_key, CacheStore};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::{ApiConfig, ApiError, CompanyProfile, MarketSummary, Quote, Sector, Symbol};

pub const MARKET_SUMMARY: &str = "/market/summary/";
pub const MARKET_SECTORS: &str = "/market/sectors/";
pub const QUOTES: &str = "/quotes/";

/// The four ranked movers lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoversKind {
    Gainers,
    Losers,
    Volume,
    Value,
}

impl MoversKind {
    pub const ALL: [MoversKind; 4] = [
        MoversKind::Gainers,
        MoversKind::Losers,
        MoversKind::Volume,
        MoversKind::Value,
    ];

    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Gainers => "/market/gainers/",
            Self::Losers => "/market/losers/",
            Self::Volume => "/market/volume/",
            Self::Value => "/market/value/",
        }
    }

    /// Key of the list inside the response payload.
    pub const fn list_key(self) -> &'static str {
        match self {
            Self::Gainers => "gainers",
            Self::Losers => "losers",
            Self::Volume | Self::Value => "stocks",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Gainers => "Top gainers",
            Self::Losers => "Top losers",
            Self::Volume => "Most active by volume",
            Self::Value => "Most active by value",
        }
    }
}

/// Outcome of a single-symbol lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteLookup {
    Found {
        quote: Box<Quote>,
        company: Option<CompanyProfile>,
    },
    NotFound {
        symbol: String,
    },
    Unavailable,
}

/// Cached, failure-reporting client for the SAHMK REST API.
///
/// Clones share the cache, the failure list and the request counter.
#[derive(Clone)]
pub struct SahmkClient {
    http: Arc<dyn HttpClient>,
    config: ApiConfig,
    cache: CacheStore<Value>,
    reported: Arc<Mutex<Vec<ApiError>>>,
    network_requests: Arc<AtomicU64>,
}

impl SahmkClient {
    pub fn new(http: Arc<dyn HttpClient>, config: ApiConfig) -> Self {
        let cache = CacheStore::new(config.cache_ttl());
        Self {
            http,
            config,
            cache,
            reported: Arc::new(Mutex::new(Vec::new())),
            network_requests: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Cached GET. Any failure is reported and yields `None`.
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Option<Value> {
        match self.fetch(endpoint, params).await {
            Ok(value) => Some(value),
            Err(error) => {
                self.report(error);
                None
            }
        }
    }

    /// Cached GET that hands the failure back instead of reporting it.
    ///
    /// Only successful, decodable responses are cached.
    pub async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        let key = cache_key(endpoint, params);
        if let Some(value) = self.cache.get(&key).await {
            tracing::trace!(%key, "cache hit");
            return Ok(value);
        }

        let timeout_ms = u64::try_from(self.config.timeout().as_millis()).unwrap_or(u64::MAX);
        let mut request = HttpRequest::get(self.config.endpoint_url(endpoint)).with_timeout_ms(timeout_ms);
        if self.config.has_api_key() {
            request = request.with_auth(&HttpAuth::api_key(self.config.api_key()));
        }
        for (name, value) in params {
            request = request.with_query(*name, value.clone());
        }

        self.network_requests.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(url = %request.full_url(), "GET");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| ApiError::Transport {
                endpoint: endpoint.to_owned(),
                message: error.message().to_owned(),
                timeout: error.is_timeout(),
            })?;

        if !response.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_owned(),
                status: response.status,
            });
        }

        let value: Value = serde_json::from_str(&response.body).map_err(|error| ApiError::Decode {
            endpoint: endpoint.to_owned(),
            message: error.to_string(),
        })?;

        self.cache.put(key, value.clone()).await;
        Ok(value)
    }

    /// Drop every cached response.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        tracing::debug!("api cache cleared");
    }

    /// Number of requests that reached the transport.
    pub fn network_requests(&self) -> u64 {
        self.network_requests.load(Ordering::Relaxed)
    }

    /// Drain failures reported since the last call.
    pub fn take_reported(&self) -> Vec<ApiError> {
        let mut reported = self.reported.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *reported)
    }

    fn report(&self, error: ApiError) {
        tracing::warn!(endpoint = error.endpoint(), code = error.code(), "{error}");
        self.reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    async fn get_as<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Option<T> {
        let value = self.get(endpoint, params).await?;
        self.decode(endpoint, value)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        key: &str,
    ) -> Option<Vec<T>> {
        let mut value = self.get(endpoint, params).await?;
        let items: Vec<Value> = match value.get_mut(key).map(Value::take) {
            Some(list) if !list.is_null() => self.decode(endpoint, list)?,
            _ => return Some(Vec::new()),
        };

        // A malformed element only costs its own row.
        let total = items.len();
        let decoded: Vec<T> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(error) => {
                    tracing::warn!(endpoint, %error, "skipping malformed list element");
                    None
                }
            })
            .collect();
        if decoded.len() < total {
            tracing::debug!(endpoint, kept = decoded.len(), total, "partially decoded list");
        }
        Some(decoded)
    }

    fn decode<T: DeserializeOwned>(&self, endpoint: &str, value: Value) -> Option<T> {
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                self.report(ApiError::Decode {
                    endpoint: endpoint.to_owned(),
                    message: error.to_string(),
                });
                None
            }
        }
    }

    pub async fn market_summary(&self) -> Option<MarketSummary> {
        self.get_as(MARKET_SUMMARY, &[]).await
    }

    pub async fn movers(&self, kind: MoversKind, limit: usize) -> Option<Vec<Quote>> {
        self.get_list(kind.endpoint(), &[("limit", limit.to_string())], kind.list_key())
            .await
    }

    pub async fn gainers(&self, limit: usize) -> Option<Vec<Quote>> {
        self.movers(MoversKind::Gainers, limit).await
    }

    pub async fn losers(&self, limit: usize) -> Option<Vec<Quote>> {
        self.movers(MoversKind::Losers, limit).await
    }

    pub async fn volume_leaders(&self, limit: usize) -> Option<Vec<Quote>> {
        self.movers(MoversKind::Volume, limit).await
    }

    pub async fn value_leaders(&self, limit: usize) -> Option<Vec<Quote>> {
        self.movers(MoversKind::Value, limit).await
    }

    pub async fn sectors(&self) -> Option<Vec<Sector>> {
        self.get_list(MARKET_SECTORS, &[], "sectors").await
    }

    pub async fn quote(&self, symbol: &Symbol) -> Option<Quote> {
        self.get_as(&quote_endpoint(symbol), &[]).await
    }

    /// One batch call; the caller keeps batches within the upstream limit.
    pub async fn quotes(&self, symbols: &[Symbol]) -> Option<Vec<Quote>> {
        if symbols.is_empty() {
            return Some(Vec::new());
        }
        self.get_list(QUOTES, &[("symbols", Symbol::join(symbols))], "quotes")
            .await
    }

    pub async fn company(&self, symbol: &Symbol) -> Option<CompanyProfile> {
        self.get_as(&company_endpoint(symbol), &[]).await
    }

    /// Resolve free-form user input to a quote and, when available, a profile.
    ///
    /// Malformed input and 404 answers are a plain not-found, not a failure.
    pub async fn lookup(&self, raw: &str) -> QuoteLookup {
        let symbol = match Symbol::parse(raw) {
            Ok(symbol) => symbol,
            Err(error) => {
                tracing::debug!(input = raw, %error, "lookup input is not a symbol");
                return QuoteLookup::NotFound {
                    symbol: raw.trim().to_owned(),
                };
            }
        };

        let not_found = || QuoteLookup::NotFound {
            symbol: symbol.to_string(),
        };

        let endpoint = quote_endpoint(&symbol);
        let value = match self.fetch(&endpoint, &[]).await {
            Ok(value) => value,
            Err(error) if error.is_not_found() => return not_found(),
            Err(error) => {
                self.report(error);
                return QuoteLookup::Unavailable;
            }
        };
        if value.get("symbol").map_or(true, Value::is_null) {
            return not_found();
        }
        let Some(quote) = self.decode::<Quote>(&endpoint, value) else {
            return QuoteLookup::Unavailable;
        };

        let endpoint = company_endpoint(&symbol);
        let company = match self.fetch(&endpoint, &[]).await {
            Ok(value) => self.decode::<CompanyProfile>(&endpoint, value),
            Err(error) if error.is_not_found() => None,
            Err(error) => {
                self.report(error);
                None
            }
        };

        QuoteLookup::Found {
            quote: Box::new(quote),
            company,
        }
    }
}

fn quote_endpoint(symbol: &Symbol) -> String {
    format!("/quote/{symbol}/")
}

fn company_endpoint(symbol: &Symbol) -> String {
    format!("/company/{symbol}/")
}
