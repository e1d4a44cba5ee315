//! # TASI Core
//!
//! Data access and metric derivation for the TASI market and fundamentals
//! dashboards.
//!
//! ## Overview
//!
//! - **API client** for the SAHMK market-data REST API with a 60 second
//!   response cache and non-fatal failure reporting
//! - **Fundamentals loader** joining a static CSV table with batched live quotes
//! - **Pure metrics**: magnitude formatting, change coloring, liquidity flow,
//!   Shariah screening, radar scoring and sector aggregation
//! - **Response envelope** with metadata and structured errors
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api_client`] | Cached SAHMK client, typed endpoint wrappers, symbol lookup |
//! | [`cache`] | TTL cache store shared by the client and the loader |
//! | [`config`] | Base URL, API key and timeout settings |
//! | [`dataset`] | CSV loader for the fundamentals table |
//! | [`domain`] | Quotes, market summary, sectors, fundamentals |
//! | [`enrichment`] | Batched quote enrichment of the fundamentals table |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`metrics`] | Pure derived metrics |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tasi_core::{ApiConfig, ReqwestHttpClient, SahmkClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SahmkClient::new(Arc::new(ReqwestHttpClient::new()), ApiConfig::from_env()?);
//!
//!     if let Some(summary) = client.market_summary().await {
//!         println!("TASI {:?}", summary.index_value);
//!     }
//!     for error in client.take_reported() {
//!         eprintln!("{error}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! - The API key is read from the environment and redacted from `Debug` output
//! - All HTTP requests use TLS via rustls

pub mod api_client;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod enrichment;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod metrics;

pub use api_client::{MoversKind, QuoteLookup, SahmkClient};

pub use cache::CacheStore;

pub use config::ApiConfig;

pub use dataset::{FundamentalsDataset, DEFAULT_DATASET_PATH};

pub use domain::{
    BalanceSheet, Breadth, CompanyProfile, Direction, EnrichedFundamental, FundamentalMetric,
    FundamentalRecord, Liquidity, MarketSummary, Mood, Quote, Sector, SectorCode, Symbol,
    UtcDateTime, BANK_SECTORS,
};

pub use enrichment::{merge_quotes, FundamentalsLoader, QUOTE_BATCH_LIMIT};

pub use envelope::{DataOrigin, Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};

pub use error::{ApiError, CoreError, DatasetError, ValidationError};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
