use serde::Serialize;

use crate::{FundamentalMetric, FundamentalRecord, BANK_SECTORS};

/// Mean of one metric for a sector group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorAverage {
    pub sector: String,
    pub mean: f64,
    pub count: usize,
}

/// Group by sector label and average `metric`, sorted ascending by mean.
///
/// Groups are formed in first-appearance order and the sort is stable, so
/// ties keep that order. A single-row sector reports that row's own value.
pub fn sector_averages<R: AsRef<FundamentalRecord>>(
    records: &[R],
    metric: FundamentalMetric,
) -> Vec<SectorAverage> {
    let mut groups: Vec<(String, f64, usize)> = Vec::new();

    for record in records.iter().map(AsRef::as_ref) {
        let value = record.value(metric);
        match groups.iter_mut().find(|(sector, _, _)| *sector == record.sector) {
            Some((_, sum, count)) => {
                *sum += value;
                *count += 1;
            }
            None => groups.push((record.sector.clone(), value, 1)),
        }
    }

    let mut averages: Vec<SectorAverage> = groups
        .into_iter()
        .map(|(sector, sum, count)| SectorAverage {
            sector,
            mean: sum / count as f64,
            count,
        })
        .collect();
    averages.sort_by(|a, b| a.mean.total_cmp(&b.mean));
    averages
}

/// Median of the finite values, or `None` when there are none.
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Position of a stock on the P/E vs P/B scatter relative to the medians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    Undervalued,
    Overvalued,
    Mixed,
}

impl Quadrant {
    pub fn classify(pe: f64, pb: f64, median_pe: f64, median_pb: f64) -> Self {
        if pe < median_pe && pb < median_pb {
            Self::Undervalued
        } else if pe > median_pe && pb > median_pb {
            Self::Overvalued
        } else {
            Self::Mixed
        }
    }
}

/// Highest dividend payers, descending; non-payers are excluded.
pub fn top_dividend_yielders<R: AsRef<FundamentalRecord>>(records: &[R], n: usize) -> Vec<&R> {
    let mut payers: Vec<&R> = records
        .iter()
        .filter(|record| record.as_ref().dividend_yield > 0.0)
        .collect();
    payers.sort_by(|a, b| {
        b.as_ref()
            .dividend_yield
            .total_cmp(&a.as_ref().dividend_yield)
    });
    payers.truncate(n);
    payers
}

/// Largest companies by revenue, descending. Loss makers are kept.
pub fn top_by_revenue<R: AsRef<FundamentalRecord>>(records: &[R], n: usize) -> Vec<&R> {
    let mut ranked: Vec<&R> = records.iter().collect();
    ranked.sort_by(|a, b| b.as_ref().revenue_b.total_cmp(&a.as_ref().revenue_b));
    ranked.truncate(n);
    ranked
}

pub fn is_bank_sector(sector: &str) -> bool {
    BANK_SECTORS.contains(&sector.trim())
}

/// Metrics compared against the sector mean on the stock page.
pub const PEER_METRICS: [FundamentalMetric; 5] = [
    FundamentalMetric::Pe,
    FundamentalMetric::Pb,
    FundamentalMetric::Roe,
    FundamentalMetric::DividendYield,
    FundamentalMetric::DebtEquity,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeerMetric {
    pub metric: FundamentalMetric,
    pub stock_value: f64,
    pub sector_mean: f64,
}

/// Stock vs sector mean (the stock included) for [`PEER_METRICS`].
///
/// Returns `None` when the stock is alone in its sector.
pub fn peer_comparison<R: AsRef<FundamentalRecord>>(
    stock: &FundamentalRecord,
    records: &[R],
) -> Option<Vec<PeerMetric>> {
    let peers: Vec<&FundamentalRecord> = records
        .iter()
        .map(AsRef::as_ref)
        .filter(|record| record.sector == stock.sector)
        .collect();
    if peers.len() <= 1 {
        return None;
    }

    let count = peers.len() as f64;
    let comparison = PEER_METRICS
        .into_iter()
        .map(|metric| PeerMetric {
            metric,
            stock_value: stock.value(metric),
            sector_mean: peers.iter().map(|peer| peer.value(metric)).sum::<f64>() / count,
        })
        .collect();
    Some(comparison)
}
