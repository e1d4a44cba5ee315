//! # Domain Models
//!
//! Typed records for everything the dashboards read: upstream API payloads
//! and rows of the static fundamentals dataset.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Quote`] | Live quote with optional nested [`Liquidity`] |
//! | [`CompanyProfile`] | Company metadata |
//! | [`MarketSummary`] | Index value, mood and breadth |
//! | [`Mood`] | Seven-level ordinal market sentiment |
//! | [`Sector`] / [`SectorCode`] | Sector performance and the closed code table |
//! | [`FundamentalRecord`] | One row of the fundamentals dataset |
//! | [`EnrichedFundamental`] | Dataset row joined with live price fields |
//! | [`Symbol`] | Validated ticker |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Records are transient: they are rebuilt on every refresh and never mutated.

mod fundamentals;
mod market;
mod quote;
mod sector;
mod symbol;
mod timestamp;

#[cfg(test)]
pub(crate) use fundamentals::fixtures;
pub use fundamentals::{
    BalanceSheet, EnrichedFundamental, FundamentalMetric, FundamentalRecord, BANK_SECTORS,
};
pub use market::{Breadth, MarketSummary, Mood};
pub use quote::{CompanyProfile, Liquidity, Quote};
pub use sector::{Direction, Sector, SectorCode};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
