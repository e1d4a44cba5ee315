//! Fundamentals dashboards: the static dataset joined with live quotes.
//!
//! Every view loads the enriched table through the session's
//! [`FundamentalsLoader`](tasi_core::FundamentalsLoader), so the first view
//! rendered in a session pays for the batched quote calls and the rest are
//! served from the cache.

use serde::Serialize;
use tasi_core::metrics::{
    change_color, median, pe_display, peer_comparison, radar_scores, sector_averages,
    shariah_status, top_by_revenue, top_dividend_yielders, CurrentRatioBand, PeerMetric, ProfitabilityBand,
    Quadrant, RadarScore, SectorAverage, ShariahSummary, SHARIAH_MAX_DEBT_RATIO,
};
use tasi_core::{
    BalanceSheet, DataOrigin, EnrichedFundamental, FundamentalMetric, FundamentalRecord, Symbol,
};

use super::overview::SummaryView;
use super::rows::truncate;
use super::{PageOutput, Session};
use crate::cli::{FundamentalsArgs, FundamentalsView};
use crate::error::CliError;

const DIVIDEND_LEADERS: usize = 10;
const ROE_BENCHMARK: f64 = 15.0;
const REVENUE_LEADERS: usize = 12;
const NAME_WIDTH: usize = 28;

pub async fn run(session: &Session, args: &FundamentalsArgs) -> Result<PageOutput, CliError> {
    // Malformed input can never match a dataset row; answer without loading.
    if let FundamentalsView::Stock { symbol } = &args.view {
        if let Err(error) = Symbol::parse(symbol) {
            tracing::debug!(input = %symbol, %error, "stock input is not a symbol");
            return PageOutput::new(StockData::not_found(symbol.trim()), vec![DataOrigin::Dataset]);
        }
    }

    let loader = session.loader().await?;
    let rows = loader.load_enriched().await;
    let source_chain = vec![DataOrigin::Sahmk, DataOrigin::Dataset];

    let mut output = match &args.view {
        FundamentalsView::Summary => {
            let summary = session.client().market_summary().await;
            let market = summary.as_ref().map(SummaryView::new);
            PageOutput::new(summary_view(market, &rows), source_chain)?
        }
        FundamentalsView::Valuation => PageOutput::new(valuation_view(&rows), source_chain)?,
        FundamentalsView::Solvency => PageOutput::new(solvency_view(&rows), source_chain)?,
        FundamentalsView::Profitability => {
            PageOutput::new(profitability_view(&rows), source_chain)?
        }
        FundamentalsView::Stock { symbol } => {
            PageOutput::new(stock_view(symbol, &rows), source_chain)?
        }
    };

    let missing = rows.iter().filter(|row| !row.has_live_quote()).count();
    if missing > 0 {
        output = output.with_warning(format!(
            "{missing} of {} symbols without live quotes",
            rows.len()
        ));
    }
    Ok(output)
}

#[derive(Debug, Serialize)]
struct SummaryData {
    market: Option<SummaryView>,
    companies: usize,
    live_quotes: usize,
    shariah_compliant: usize,
    median_dividend_yield: Option<f64>,
    top_dividend_yielders: Vec<DividendRow>,
}

#[derive(Debug, Serialize)]
struct DividendRow {
    symbol: String,
    name: String,
    sector: String,
    dividend_yield: f64,
    price: Option<f64>,
    change_percent: Option<f64>,
}

fn summary_view(market: Option<SummaryView>, rows: &[EnrichedFundamental]) -> SummaryData {
    SummaryData {
        market,
        companies: rows.len(),
        live_quotes: rows.iter().filter(|row| row.has_live_quote()).count(),
        shariah_compliant: rows.iter().filter(|row| row.record.shariah_compliant).count(),
        median_dividend_yield: median(
            rows.iter()
                .map(|row| row.record.dividend_yield)
                .filter(|dy| *dy > 0.0),
        ),
        top_dividend_yielders: top_dividend_yielders(rows, DIVIDEND_LEADERS)
            .into_iter()
            .map(|row| DividendRow {
                symbol: row.record.symbol.to_string(),
                name: truncate(&row.record.name, NAME_WIDTH),
                sector: row.record.sector.clone(),
                dividend_yield: row.record.dividend_yield,
                price: row.price,
                change_percent: row.change_percent,
            })
            .collect(),
    }
}

#[derive(Debug, Serialize)]
struct ValuationData {
    median_pe: Option<f64>,
    median_pb: Option<f64>,
    positions: Vec<ValuationRow>,
    loss_making: Vec<String>,
    sector_pe: Vec<SectorAverage>,
    sector_roe: Vec<SectorAverage>,
}

#[derive(Debug, Serialize)]
struct ValuationRow {
    symbol: String,
    name: String,
    sector: String,
    pe: String,
    pb: f64,
    roe: f64,
    quadrant: Option<Quadrant>,
}

/// P/E vs P/B positioning. Medians are taken over the profitable
/// (P/E > 0) universe; loss makers are listed but not positioned.
fn valuation_view(rows: &[EnrichedFundamental]) -> ValuationData {
    let profitable: Vec<&EnrichedFundamental> =
        rows.iter().filter(|row| row.record.pe > 0.0).collect();
    let median_pe = median(profitable.iter().map(|row| row.record.pe));
    let median_pb = median(profitable.iter().map(|row| row.record.pb));

    let positions = rows
        .iter()
        .map(|row| {
            let record = &row.record;
            let quadrant = match (median_pe, median_pb) {
                (Some(mpe), Some(mpb)) if record.pe > 0.0 => {
                    Some(Quadrant::classify(record.pe, record.pb, mpe, mpb))
                }
                _ => None,
            };
            ValuationRow {
                symbol: record.symbol.to_string(),
                name: truncate(&record.name, NAME_WIDTH),
                sector: record.sector.clone(),
                pe: pe_display(record.pe),
                pb: record.pb,
                roe: record.roe,
                quadrant,
            }
        })
        .collect();

    ValuationData {
        median_pe,
        median_pb,
        positions,
        loss_making: rows
            .iter()
            .filter(|row| row.record.pe <= 0.0)
            .map(|row| row.record.symbol.to_string())
            .collect(),
        sector_pe: sector_averages(&profitable, FundamentalMetric::Pe),
        sector_roe: sector_averages(rows, FundamentalMetric::Roe),
    }
}

#[derive(Debug, Serialize)]
struct SolvencyData {
    threshold: f64,
    shariah: ShariahSummary,
    screening: Vec<ScreeningRow>,
    /// Banks are excluded: deposits make their leverage incomparable.
    leverage: Vec<LeverageRow>,
    current_ratio: Vec<CurrentRatioRow>,
}

#[derive(Debug, Serialize)]
struct ScreeningRow {
    symbol: String,
    name: String,
    debt_ratio: f64,
    screened: &'static str,
    flagged_compliant: bool,
    agrees: bool,
}

#[derive(Debug, Serialize)]
struct LeverageRow {
    symbol: String,
    name: String,
    sector: String,
    debt_equity: f64,
}

#[derive(Debug, Serialize)]
struct CurrentRatioRow {
    symbol: String,
    name: String,
    current_ratio: f64,
    band: CurrentRatioBand,
}

fn solvency_view(rows: &[EnrichedFundamental]) -> SolvencyData {
    let mut screening: Vec<ScreeningRow> = rows
        .iter()
        .map(|row| {
            let record = &row.record;
            let status = shariah_status(record.shariah_debt_ratio);
            ScreeningRow {
                symbol: record.symbol.to_string(),
                name: truncate(&record.name, NAME_WIDTH),
                debt_ratio: record.shariah_debt_ratio,
                screened: status.label(),
                flagged_compliant: record.shariah_compliant,
                agrees: status.is_compliant() == record.shariah_compliant,
            }
        })
        .collect();
    screening.sort_by(|a, b| a.debt_ratio.total_cmp(&b.debt_ratio));

    let mut leverage: Vec<LeverageRow> = rows
        .iter()
        .map(|row| &row.record)
        .filter(|record| !record.is_bank())
        .map(|record| LeverageRow {
            symbol: record.symbol.to_string(),
            name: truncate(&record.name, NAME_WIDTH),
            sector: record.sector.clone(),
            debt_equity: record.debt_equity,
        })
        .collect();
    leverage.sort_by(|a, b| b.debt_equity.total_cmp(&a.debt_equity));

    let mut current_ratio: Vec<CurrentRatioRow> = rows
        .iter()
        .map(|row| CurrentRatioRow {
            symbol: row.record.symbol.to_string(),
            name: truncate(&row.record.name, NAME_WIDTH),
            current_ratio: row.record.current_ratio,
            band: CurrentRatioBand::of(row.record.current_ratio),
        })
        .collect();
    current_ratio.sort_by(|a, b| b.current_ratio.total_cmp(&a.current_ratio));

    SolvencyData {
        threshold: SHARIAH_MAX_DEBT_RATIO,
        shariah: ShariahSummary::from_records(rows),
        screening,
        leverage,
        current_ratio,
    }
}

#[derive(Debug, Serialize)]
struct ProfitabilityData {
    roe_benchmark: f64,
    above_benchmark: usize,
    roe: Vec<BandedRow>,
    net_margin: Vec<BandedRow>,
    sector_net_margin: Vec<SectorAverage>,
    revenue_vs_income: Vec<RevenueRow>,
}

#[derive(Debug, Serialize)]
struct RevenueRow {
    symbol: String,
    name: String,
    revenue_b: f64,
    net_income_b: f64,
}

#[derive(Debug, Serialize)]
struct BandedRow {
    symbol: String,
    name: String,
    value: f64,
    band: ProfitabilityBand,
}

fn banded(rows: &[EnrichedFundamental], metric: FundamentalMetric) -> Vec<BandedRow> {
    let mut banded: Vec<BandedRow> = rows
        .iter()
        .map(|row| {
            let value = row.record.value(metric);
            BandedRow {
                symbol: row.record.symbol.to_string(),
                name: truncate(&row.record.name, NAME_WIDTH),
                value,
                band: ProfitabilityBand::of(value),
            }
        })
        .collect();
    banded.sort_by(|a, b| b.value.total_cmp(&a.value));
    banded
}

fn profitability_view(rows: &[EnrichedFundamental]) -> ProfitabilityData {
    ProfitabilityData {
        roe_benchmark: ROE_BENCHMARK,
        above_benchmark: rows
            .iter()
            .filter(|row| row.record.roe > ROE_BENCHMARK)
            .count(),
        roe: banded(rows, FundamentalMetric::Roe),
        net_margin: banded(rows, FundamentalMetric::NetMargin),
        sector_net_margin: sector_averages(rows, FundamentalMetric::NetMargin),
        revenue_vs_income: top_by_revenue(rows, REVENUE_LEADERS)
            .into_iter()
            .map(|row| RevenueRow {
                symbol: row.record.symbol.to_string(),
                name: truncate(&row.record.name, NAME_WIDTH),
                revenue_b: row.record.revenue_b,
                net_income_b: row.record.net_income_b,
            })
            .collect(),
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum StockData {
    Found(Box<StockProfile>),
    NotFound { message: String },
}

#[derive(Debug, Serialize)]
struct StockProfile {
    symbol: String,
    name: String,
    sector: String,
    price: Option<f64>,
    change: Option<f64>,
    change_percent: Option<f64>,
    color: &'static str,
    pe: String,
    pb: f64,
    roe: f64,
    net_margin: f64,
    dividend_yield: f64,
    debt_equity: f64,
    current_ratio: f64,
    current_ratio_band: CurrentRatioBand,
    shariah_debt_ratio: f64,
    shariah_screened: &'static str,
    shariah_flagged_compliant: bool,
    radar: Vec<RadarScore>,
    balance_sheet: BalanceSheet,
    peers: PeerSection,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PeerSection {
    Compared(Vec<PeerMetric>),
    Alone { note: String },
}

impl StockData {
    fn not_found(symbol: &str) -> Self {
        Self::NotFound {
            message: format!("symbol '{symbol}' is not in the fundamentals dataset"),
        }
    }
}

fn stock_view(input: &str, rows: &[EnrichedFundamental]) -> StockData {
    let Ok(symbol) = Symbol::parse(input) else {
        return StockData::not_found(input.trim());
    };
    let Some(row) = rows.iter().find(|row| row.record.symbol == symbol) else {
        return StockData::not_found(symbol.as_str());
    };
    let record: &FundamentalRecord = &row.record;
    let status = shariah_status(record.shariah_debt_ratio);

    let peers = match peer_comparison(record, rows) {
        Some(metrics) => PeerSection::Compared(metrics),
        None => PeerSection::Alone {
            note: format!("no other '{}' companies to compare against", record.sector),
        },
    };

    StockData::Found(Box::new(StockProfile {
        symbol: record.symbol.to_string(),
        name: record.name.clone(),
        sector: record.sector.clone(),
        price: row.price,
        change: row.change,
        change_percent: row.change_percent,
        color: change_color(row.change.unwrap_or(0.0)).hex(),
        pe: pe_display(record.pe),
        pb: record.pb,
        roe: record.roe,
        net_margin: record.net_margin,
        dividend_yield: record.dividend_yield,
        debt_equity: record.debt_equity,
        current_ratio: record.current_ratio,
        current_ratio_band: CurrentRatioBand::of(record.current_ratio),
        shariah_debt_ratio: record.shariah_debt_ratio,
        shariah_screened: status.label(),
        shariah_flagged_compliant: record.shariah_compliant,
        radar: radar_scores(record),
        balance_sheet: record.balance_sheet(),
        peers,
    }))
}
