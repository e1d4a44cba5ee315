use serde::Serialize;

use crate::FundamentalRecord;

/// Debt-ratio ceiling (percent) for the Shariah screen; the bound is exclusive.
pub const SHARIAH_MAX_DEBT_RATIO: f64 = 33.0;

pub fn net_liquidity(inflow: f64, outflow: f64) -> f64 {
    inflow - outflow
}

/// Direction of money flow implied by a net figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityPressure {
    Buy,
    Sell,
}

impl LiquidityPressure {
    /// Zero net counts as sell pressure.
    pub fn from_net(net: f64) -> Self {
        if net > 0.0 {
            Self::Buy
        } else {
            Self::Sell
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Buy => "buy pressure",
            Self::Sell => "sell pressure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShariahStatus {
    Compliant,
    NonCompliant,
}

impl ShariahStatus {
    pub const fn is_compliant(self) -> bool {
        matches!(self, Self::Compliant)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non-compliant",
        }
    }
}

pub fn shariah_status(debt_ratio: f64) -> ShariahStatus {
    shariah_status_with(debt_ratio, SHARIAH_MAX_DEBT_RATIO)
}

/// Applied uniformly regardless of sector. A NaN ratio never passes.
pub fn shariah_status_with(debt_ratio: f64, threshold: f64) -> ShariahStatus {
    if debt_ratio < threshold {
        ShariahStatus::Compliant
    } else {
        ShariahStatus::NonCompliant
    }
}

/// Traffic-light band for the current ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentRatioBand {
    Weak,
    Adequate,
    Strong,
}

impl CurrentRatioBand {
    pub fn of(current_ratio: f64) -> Self {
        if current_ratio < 1.0 {
            Self::Weak
        } else if current_ratio < 1.5 {
            Self::Adequate
        } else {
            Self::Strong
        }
    }
}

/// Band shared by ROE and net margin, both in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitabilityBand {
    Negative,
    Moderate,
    Strong,
}

impl ProfitabilityBand {
    pub fn of(percent: f64) -> Self {
        if percent < 0.0 {
            Self::Negative
        } else if percent < 10.0 {
            Self::Moderate
        } else {
            Self::Strong
        }
    }
}

/// Counts for the Shariah screening header.
///
/// `compliant` follows the dataset's own flag; `screened_compliant` applies
/// the debt-ratio threshold. The two are reported side by side and
/// `disagreements` counts rows where they differ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShariahSummary {
    pub total: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub compliant_pct: f64,
    pub non_compliant_pct: f64,
    pub screened_compliant: usize,
    pub disagreements: usize,
}

impl ShariahSummary {
    pub fn from_records<R: AsRef<FundamentalRecord>>(records: &[R]) -> Self {
        let total = records.len();
        let mut compliant = 0;
        let mut screened_compliant = 0;
        let mut disagreements = 0;

        for record in records.iter().map(AsRef::as_ref) {
            let screened = shariah_status(record.shariah_debt_ratio).is_compliant();
            if record.shariah_compliant {
                compliant += 1;
            }
            if screened {
                screened_compliant += 1;
            }
            if screened != record.shariah_compliant {
                disagreements += 1;
            }
        }

        let non_compliant = total - compliant;
        Self {
            total,
            compliant,
            non_compliant,
            compliant_pct: percent_of(compliant, total),
            non_compliant_pct: percent_of(non_compliant, total),
            screened_compliant,
            disagreements,
        }
    }
}

fn percent_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
