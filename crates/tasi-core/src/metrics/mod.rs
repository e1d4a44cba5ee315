//! Pure metric derivation.
//!
//! Nothing in this module performs I/O or holds state; every function maps
//! its inputs to a value the presentation layer renders verbatim.

mod aggregate;
mod format;
mod scoring;
mod screening;

pub use aggregate::{
    is_bank_sector, median, peer_comparison, sector_averages, top_by_revenue,
    top_dividend_yielders, PeerMetric, Quadrant, SectorAverage, PEER_METRICS,
};
pub use format::{change_color, format_magnitude, pe_display, ChangeColor};
pub use scoring::{mood_gauge_score, normalize, radar_scores, RadarDimension, RadarScore};
pub use screening::{
    net_liquidity, shariah_status, shariah_status_with, CurrentRatioBand, LiquidityPressure,
    ProfitabilityBand, ShariahStatus, ShariahSummary, SHARIAH_MAX_DEBT_RATIO,
};
