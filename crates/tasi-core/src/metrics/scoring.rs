use serde::Serialize;

use crate::{FundamentalRecord, Mood};

use super::screening::SHARIAH_MAX_DEBT_RATIO;

/// Linear rescale of `value` from `[min, max]` onto `[0, 100]`, clamped.
///
/// A degenerate range (`min == max`) yields the midpoint 50. A NaN value
/// yields 0.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if min == max {
        return 50.0;
    }
    if value.is_nan() {
        return 0.0;
    }

    ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

/// Gauge position for a mood; an unknown mood sits at neutral.
pub fn mood_gauge_score(mood: Option<Mood>) -> u8 {
    mood.map_or(Mood::Neutral.score(), Mood::score)
}

/// Axes of the single-stock radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RadarDimension {
    Profitability,
    DividendYield,
    Solvency,
    Liquidity,
    NetMargin,
    ShariahHeadroom,
}

impl RadarDimension {
    pub const ALL: [RadarDimension; 6] = [
        RadarDimension::Profitability,
        RadarDimension::DividendYield,
        RadarDimension::Solvency,
        RadarDimension::Liquidity,
        RadarDimension::NetMargin,
        RadarDimension::ShariahHeadroom,
    ];

    /// Fixed calibration range; not derived from the dataset.
    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::Profitability => (-5.0, 65.0),
            Self::DividendYield => (0.0, 8.0),
            Self::Solvency => (0.0, 2.0),
            Self::Liquidity => (0.5, 3.5),
            Self::NetMargin => (-10.0, 55.0),
            Self::ShariahHeadroom => (0.0, SHARIAH_MAX_DEBT_RATIO),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Profitability => "Profitability (ROE)",
            Self::DividendYield => "Dividend yield",
            Self::Solvency => "Solvency",
            Self::Liquidity => "Liquidity",
            Self::NetMargin => "Net margin",
            Self::ShariahHeadroom => "Shariah headroom",
        }
    }

    /// Input fed to [`normalize`] for this axis.
    pub fn raw(self, record: &FundamentalRecord) -> f64 {
        match self {
            Self::Profitability => record.roe,
            Self::DividendYield => record.dividend_yield,
            Self::Solvency => 2.0 - record.debt_equity,
            Self::Liquidity => record.current_ratio,
            Self::NetMargin => record.net_margin,
            Self::ShariahHeadroom => SHARIAH_MAX_DEBT_RATIO - record.shariah_debt_ratio,
        }
    }

    pub fn score(self, record: &FundamentalRecord) -> f64 {
        let (min, max) = self.range();
        normalize(self.raw(record), min, max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarScore {
    pub dimension: RadarDimension,
    pub raw: f64,
    pub score: f64,
}

pub fn radar_scores(record: &FundamentalRecord) -> Vec<RadarScore> {
    RadarDimension::ALL
        .into_iter()
        .map(|dimension| RadarScore {
            dimension,
            raw: dimension.raw(record),
            score: dimension.score(record),
        })
        .collect()
}
