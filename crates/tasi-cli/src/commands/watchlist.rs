use serde::Serialize;
use tasi_core::metrics::{format_magnitude, LiquidityPressure};
use tasi_core::{Quote, Symbol, QUOTE_BATCH_LIMIT};

use super::rows::QuoteRow;
use super::{PageOutput, Session};
use crate::cli::WatchlistArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct WatchlistRow {
    #[serde(flatten)]
    quote: QuoteRow,
    net_liquidity: String,
    pressure: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct NetFlowBar {
    symbol: String,
    net_millions: f64,
    pressure: &'static str,
}

#[derive(Debug, Serialize)]
struct WatchlistData {
    symbols: Vec<String>,
    rows: Option<Vec<WatchlistRow>>,
    /// Ascending by net flow, as charted.
    net_flow: Vec<NetFlowBar>,
}

pub async fn run(session: &Session, args: &WatchlistArgs) -> Result<PageOutput, CliError> {
    let symbols = args
        .resolved_symbols()
        .iter()
        .map(|raw| Symbol::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut quotes: Option<Vec<Quote>> = None;
    for batch in symbols.chunks(QUOTE_BATCH_LIMIT) {
        if let Some(batch_quotes) = session.client().quotes(batch).await {
            quotes.get_or_insert_with(Vec::new).extend(batch_quotes);
        }
    }

    let mut net_flow: Vec<NetFlowBar> = quotes
        .iter()
        .flatten()
        .filter_map(|quote| {
            quote.net_flow().map(|net| NetFlowBar {
                symbol: quote.symbol.to_string(),
                net_millions: net / 1e6,
                pressure: LiquidityPressure::from_net(net).label(),
            })
        })
        .collect();
    net_flow.sort_by(|a, b| a.net_millions.total_cmp(&b.net_millions));

    let rows = quotes.map(|quotes| {
        quotes
            .iter()
            .map(|quote| {
                let net = quote.net_flow();
                WatchlistRow {
                    quote: QuoteRow::from(quote),
                    net_liquidity: format_magnitude(net, "", " SAR"),
                    pressure: net.map(|net| LiquidityPressure::from_net(net).label()),
                }
            })
            .collect()
    });

    PageOutput::live(WatchlistData {
        symbols: symbols.iter().map(Symbol::to_string).collect(),
        rows,
        net_flow,
    })
}
