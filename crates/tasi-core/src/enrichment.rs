//! Joins the static fundamentals table with live quotes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::api_client::SahmkClient;
use crate::cache::CacheStore;
use crate::dataset::FundamentalsDataset;
use crate::{EnrichedFundamental, FundamentalRecord, Quote, Symbol};

/// Upstream cap on symbols per `/quotes/` call.
pub const QUOTE_BATCH_LIMIT: usize = 50;

const ENRICHED_KEY: &str = "fundamentals:enriched";

/// Loads the enriched fundamentals table, batching live quote requests.
#[derive(Clone)]
pub struct FundamentalsLoader {
    client: SahmkClient,
    dataset: Arc<FundamentalsDataset>,
    cache: CacheStore<Vec<EnrichedFundamental>>,
}

impl FundamentalsLoader {
    pub fn new(client: SahmkClient, dataset: Arc<FundamentalsDataset>) -> Self {
        let cache = CacheStore::new(client.config().cache_ttl());
        Self {
            client,
            dataset,
            cache,
        }
    }

    pub fn dataset(&self) -> &FundamentalsDataset {
        &self.dataset
    }

    pub fn client(&self) -> &SahmkClient {
        &self.client
    }

    /// One row per dataset row, in dataset order, with live fields where a
    /// quote came back. Never fails: a full outage yields all-`None` live
    /// fields.
    pub async fn load_enriched(&self) -> Vec<EnrichedFundamental> {
        if let Some(rows) = self.cache.get(ENRICHED_KEY).await {
            return rows;
        }

        let symbols = self.dataset.symbols();
        let mut quotes = Vec::new();
        for (index, batch) in symbols.chunks(QUOTE_BATCH_LIMIT).enumerate() {
            match self.client.quotes(batch).await {
                Some(batch_quotes) => quotes.extend(batch_quotes),
                None => tracing::warn!(batch = index, size = batch.len(), "live quotes unavailable for batch"),
            }
        }

        let rows = merge_quotes(self.dataset.records(), quotes);
        tracing::debug!(
            rows = rows.len(),
            live = rows.iter().filter(|row| row.has_live_quote()).count(),
            "enriched fundamentals"
        );

        self.cache.put(ENRICHED_KEY.to_owned(), rows.clone()).await;
        rows
    }

    /// Clears the enriched table; the API cache is cleared separately.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

/// Left join of `records` with `quotes` on the symbol text.
///
/// The first quote seen for a symbol wins; quotes for symbols outside the
/// table are ignored.
pub fn merge_quotes(records: &[FundamentalRecord], quotes: Vec<Quote>) -> Vec<EnrichedFundamental> {
    let mut by_symbol: HashMap<Symbol, Quote> = HashMap::with_capacity(quotes.len());
    for quote in quotes {
        by_symbol.entry(quote.symbol.clone()).or_insert(quote);
    }

    records
        .iter()
        .map(|record| match by_symbol.get(&record.symbol) {
            Some(quote) => EnrichedFundamental::with_quote(record.clone(), quote),
            None => EnrichedFundamental::without_quote(record.clone()),
        })
        .collect()
}
