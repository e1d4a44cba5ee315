mod fundamentals;
mod lookup;
mod movers;
mod overview;
mod rows;
mod sectors;
mod watchlist;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tasi_core::{
    ApiConfig, DataOrigin, Envelope, EnvelopeError, FundamentalsDataset,
    FundamentalsLoader, HttpClient, ReqwestHttpClient, SahmkClient,
};
use tokio::sync::OnceCell;

use crate::cli::{Cli, Page};
use crate::error::CliError;
use crate::metadata::Metadata;

/// Long-lived state shared by every page rendered in one process.
pub struct Session {
    client: SahmkClient,
    dataset_path: PathBuf,
    loader: OnceCell<FundamentalsLoader>,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut config = ApiConfig::from_env()?.with_timeout(Duration::from_millis(cli.timeout_ms))?;
        if let Some(base_url) = &cli.base_url {
            config = config.with_base_url(base_url.as_str())?;
        }
        if !config.has_api_key() {
            tracing::warn!("SAHMK_API_KEY is not set; requests will be rejected upstream");
        }

        Ok(Self::new(
            Arc::new(ReqwestHttpClient::new()),
            config,
            cli.dataset.clone(),
            cli.no_cache,
        ))
    }

    pub fn new(http: Arc<dyn HttpClient>, config: ApiConfig, dataset_path: PathBuf, no_cache: bool) -> Self {
        let config = if no_cache {
            config.with_cache_ttl(Duration::ZERO)
        } else {
            config
        };

        Self {
            client: SahmkClient::new(http, config),
            dataset_path,
            loader: OnceCell::new(),
        }
    }

    pub fn client(&self) -> &SahmkClient {
        &self.client
    }

    /// Loads the dataset on first use; later calls reuse it.
    pub async fn loader(&self) -> Result<&FundamentalsLoader, CliError> {
        self.loader.get_or_try_init(|| self.build_loader()).await
    }

    async fn build_loader(&self) -> Result<FundamentalsLoader, CliError> {
        let dataset = FundamentalsDataset::from_path(&self.dataset_path)?;
        Ok(FundamentalsLoader::new(self.client.clone(), Arc::new(dataset)))
    }

    /// Manual refresh: drop every cached response and derived table.
    pub async fn refresh(&self) {
        self.client.clear_cache().await;
        if let Some(loader) = self.loader.get() {
            loader.clear_cache().await;
        }
        tracing::info!("caches cleared");
    }
}

/// Output of a page handler before it is wrapped in an envelope.
pub struct PageOutput {
    pub data: Value,
    pub warnings: Vec<String>,
    pub source_chain: Vec<DataOrigin>,
}

impl PageOutput {
    pub fn new(data: impl Serialize, source_chain: Vec<DataOrigin>) -> Result<Self, CliError> {
        Ok(Self {
            data: serde_json::to_value(data)?,
            warnings: Vec::new(),
            source_chain,
        })
    }

    pub fn live(data: impl Serialize) -> Result<Self, CliError> {
        Self::new(data, vec![DataOrigin::Sahmk])
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Render one page into an envelope. API failures never abort the page:
/// they are drained from the client into `errors`.
pub async fn run(session: &Session, page: &Page) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let requests_before = session.client.network_requests();

    let output = match page {
        Page::Overview => overview::run(session).await?,
        Page::Movers(args) => movers::run(session, args).await?,
        Page::Sectors => sectors::run(session).await?,
        Page::Lookup(args) => lookup::run(session, args).await?,
        Page::Watchlist(args) => watchlist::run(session, args).await?,
        Page::Fundamentals(args) => fundamentals::run(session, args).await?,
    };

    let PageOutput {
        data,
        warnings,
        source_chain,
    } = output;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let cache_hit = session.client.network_requests() == requests_before;

    let mut metadata = Metadata::new(source_chain, latency_ms, cache_hit);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let errors = session
        .client
        .take_reported()
        .iter()
        .map(EnvelopeError::from)
        .collect();

    Ok(Envelope::with_errors(
        metadata.into_envelope_meta()?,
        data,
        errors,
    )?)
}
