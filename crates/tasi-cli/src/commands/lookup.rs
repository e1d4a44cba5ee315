use serde::Serialize;
use tasi_core::metrics::{change_color, format_magnitude, LiquidityPressure};
use tasi_core::{CompanyProfile, Liquidity, Quote, QuoteLookup};

use super::{PageOutput, Session};
use crate::cli::LookupArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum LookupData {
    Found {
        quote: QuoteView,
        liquidity: Option<LiquidityView>,
        company: Option<CompanyView>,
    },
    NotFound {
        message: String,
    },
    Unavailable,
}

#[derive(Debug, Serialize)]
struct QuoteView {
    symbol: String,
    name: String,
    price: Option<f64>,
    change: Option<f64>,
    change_percent: Option<f64>,
    color: &'static str,
    open: Option<f64>,
    day_range: String,
    previous_close: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    volume: String,
    value: String,
}

impl From<&Quote> for QuoteView {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.to_string(),
            name: quote.display_name().to_owned(),
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            color: change_color(quote.change.unwrap_or(0.0)).hex(),
            open: quote.open,
            day_range: format!("{} - {}", price_text(quote.low), price_text(quote.high)),
            previous_close: quote.previous_close,
            bid: quote.bid,
            ask: quote.ask,
            volume: format_magnitude(quote.volume, "", ""),
            value: format_magnitude(quote.value, "", " SAR"),
        }
    }
}

/// Reported and derived net flow are shown side by side, never reconciled.
#[derive(Debug, Serialize)]
struct LiquidityView {
    inflow: String,
    outflow: String,
    net_reported: String,
    net_computed: String,
    pressure: &'static str,
    inflow_share_pct: Option<f64>,
    inflow_trades: Option<f64>,
    outflow_trades: Option<f64>,
    inflow_volume: String,
    outflow_volume: String,
    inconsistent: bool,
}

impl From<&Liquidity> for LiquidityView {
    fn from(liquidity: &Liquidity) -> Self {
        let computed = liquidity.computed_net();
        let net = liquidity.net_value.unwrap_or(computed);
        let inflow = liquidity.inflow_value.unwrap_or(0.0);
        let total = inflow + liquidity.outflow_value.unwrap_or(0.0);

        Self {
            inflow: format_magnitude(liquidity.inflow_value, "", " SAR"),
            outflow: format_magnitude(liquidity.outflow_value, "", " SAR"),
            net_reported: format_magnitude(liquidity.net_value, "", " SAR"),
            net_computed: format_magnitude(Some(computed), "", " SAR"),
            pressure: LiquidityPressure::from_net(net).label(),
            inflow_share_pct: (total > 0.0).then(|| inflow / total * 100.0),
            inflow_trades: liquidity.inflow_trades,
            outflow_trades: liquidity.outflow_trades,
            inflow_volume: format_magnitude(liquidity.inflow_volume, "", ""),
            outflow_volume: format_magnitude(liquidity.outflow_volume, "", ""),
            inconsistent: liquidity.is_inconsistent(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompanyView {
    name: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    currency: String,
    website: Option<String>,
    description: Option<String>,
}

impl From<&CompanyProfile> for CompanyView {
    fn from(company: &CompanyProfile) -> Self {
        Self {
            name: company.name.clone(),
            sector: company.sector.clone(),
            industry: company.industry.clone(),
            currency: company.currency_or_default().to_owned(),
            website: company.website.clone(),
            description: company.description.clone(),
        }
    }
}

fn price_text(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("N/A"), |price| format!("{price:.2}"))
}

pub async fn run(session: &Session, args: &LookupArgs) -> Result<PageOutput, CliError> {
    let mut warnings = Vec::new();

    let data = match session.client().lookup(&args.symbol).await {
        QuoteLookup::Found { quote, company } => {
            let liquidity = quote.liquidity.as_ref().map(LiquidityView::from);
            if liquidity.as_ref().is_some_and(|view| view.inconsistent) {
                warnings.push(format!(
                    "{}: reported net flow differs from inflow minus outflow",
                    quote.symbol
                ));
            }
            LookupData::Found {
                quote: QuoteView::from(quote.as_ref()),
                liquidity,
                company: company.as_ref().map(CompanyView::from),
            }
        }
        QuoteLookup::NotFound { symbol } => LookupData::NotFound {
            message: format!("symbol '{symbol}' was not found"),
        },
        QuoteLookup::Unavailable => LookupData::Unavailable,
    };

    let mut output = PageOutput::live(data)?;
    for warning in warnings {
        output = output.with_warning(warning);
    }
    Ok(output)
}
