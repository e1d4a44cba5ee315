use serde::{Deserialize, Serialize};

use crate::{Quote, Symbol};

/// Sector labels treated as banks when excluding structurally leveraged issuers.
pub const BANK_SECTORS: [&str; 2] = ["Banks", "البنوك"];

/// One listed company from the static fundamentals dataset.
///
/// Ratios are stored as published percentages (`roe = 25.7` means 25.7%);
/// the `_b` amounts are billions of riyals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRecord {
    pub symbol: Symbol,
    pub name: String,
    pub sector: String,
    pub pe: f64,
    pub pb: f64,
    pub roe: f64,
    pub net_margin: f64,
    pub dividend_yield: f64,
    pub debt_equity: f64,
    pub current_ratio: f64,
    pub shariah_debt_ratio: f64,
    /// Upstream screening verdict; may account for sector rules the raw
    /// debt-ratio threshold does not.
    pub shariah_compliant: bool,
    pub revenue_b: f64,
    pub net_income_b: f64,
    pub total_assets_b: f64,
    pub total_debt_b: f64,
}

impl FundamentalRecord {
    pub fn value(&self, metric: FundamentalMetric) -> f64 {
        match metric {
            FundamentalMetric::Pe => self.pe,
            FundamentalMetric::Pb => self.pb,
            FundamentalMetric::Roe => self.roe,
            FundamentalMetric::NetMargin => self.net_margin,
            FundamentalMetric::DividendYield => self.dividend_yield,
            FundamentalMetric::DebtEquity => self.debt_equity,
            FundamentalMetric::CurrentRatio => self.current_ratio,
            FundamentalMetric::ShariahDebtRatio => self.shariah_debt_ratio,
        }
    }

    pub fn is_bank(&self) -> bool {
        crate::metrics::is_bank_sector(&self.sector)
    }

    pub fn balance_sheet(&self) -> BalanceSheet {
        BalanceSheet {
            revenue_b: self.revenue_b,
            net_income_b: self.net_income_b,
            total_assets_b: self.total_assets_b,
            total_debt_b: self.total_debt_b,
            equity_b: self.total_assets_b - self.total_debt_b,
        }
    }
}

/// Ratio columns that can be averaged, compared or charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundamentalMetric {
    Pe,
    Pb,
    Roe,
    NetMargin,
    DividendYield,
    DebtEquity,
    CurrentRatio,
    ShariahDebtRatio,
}

impl FundamentalMetric {
    pub const fn column(self) -> &'static str {
        match self {
            Self::Pe => "pe",
            Self::Pb => "pb",
            Self::Roe => "roe",
            Self::NetMargin => "net_margin",
            Self::DividendYield => "dividend_yield",
            Self::DebtEquity => "debt_equity",
            Self::CurrentRatio => "current_ratio",
            Self::ShariahDebtRatio => "shariah_debt_ratio",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pe => "P/E",
            Self::Pb => "P/B",
            Self::Roe => "ROE %",
            Self::NetMargin => "Net margin %",
            Self::DividendYield => "Dividend yield %",
            Self::DebtEquity => "Debt / equity",
            Self::CurrentRatio => "Current ratio",
            Self::ShariahDebtRatio => "Shariah debt ratio %",
        }
    }
}

/// Simplified statement figures in billions of riyals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceSheet {
    pub revenue_b: f64,
    pub net_income_b: f64,
    pub total_assets_b: f64,
    pub total_debt_b: f64,
    pub equity_b: f64,
}

/// Dataset row left-joined with its live quote, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedFundamental {
    #[serde(flatten)]
    pub record: FundamentalRecord,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<f64>,
}

impl EnrichedFundamental {
    pub fn without_quote(record: FundamentalRecord) -> Self {
        Self {
            record,
            price: None,
            change: None,
            change_percent: None,
            volume: None,
        }
    }

    pub fn with_quote(record: FundamentalRecord, quote: &Quote) -> Self {
        Self {
            record,
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            volume: quote.volume,
        }
    }

    pub fn has_live_quote(&self) -> bool {
        self.price.is_some()
            || self.change.is_some()
            || self.change_percent.is_some()
            || self.volume.is_some()
    }
}

impl AsRef<FundamentalRecord> for EnrichedFundamental {
    fn as_ref(&self) -> &FundamentalRecord {
        &self.record
    }
}

impl AsRef<FundamentalRecord> for FundamentalRecord {
    fn as_ref(&self) -> &FundamentalRecord {
        self
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(symbol: &str, sector: &str, roe: f64) -> FundamentalRecord {
        FundamentalRecord {
            symbol: Symbol::parse(symbol).expect("fixture symbol"),
            name: format!("Company {symbol}"),
            sector: sector.to_owned(),
            pe: 15.0,
            pb: 2.0,
            roe,
            net_margin: 12.0,
            dividend_yield: 3.0,
            debt_equity: 0.5,
            current_ratio: 1.6,
            shariah_debt_ratio: 20.0,
            shariah_compliant: true,
            revenue_b: 10.0,
            net_income_b: 1.2,
            total_assets_b: 30.0,
            total_debt_b: 12.0,
        }
    }
}
