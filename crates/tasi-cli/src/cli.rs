//! CLI argument definitions for `tasi`.
//!
//! Each dashboard page is a subcommand. `tasi shell` keeps one session
//! open so that the response cache is shared between pages until a
//! `refresh`.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `overview` | Index, mood, breadth and the top five movers |
//! | `movers` | Ranked gainers, losers, volume or value leaders |
//! | `sectors` | Sector performance |
//! | `lookup` | Single-stock quote, liquidity flow and company profile |
//! | `watchlist` | Batch quotes with net liquidity |
//! | `fundamentals` | Valuation, solvency and profitability views |
//! | `shell` | Interactive session with manual refresh |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--timeout-ms` | `10000` | Per-request timeout |
//! | `--base-url` | env / built-in | API base URL override |
//! | `--dataset` | `data/saudi_stocks_fundamentals.csv` | Fundamentals CSV |
//! | `--no-cache` | `false` | Disable response caching |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tasi_core::{MoversKind, DEFAULT_DATASET_PATH};

/// Default watchlist: the ten TASI heavyweights.
pub const DEFAULT_WATCHLIST: [&str; 10] = [
    "2222", "1120", "2010", "7010", "2350", "1180", "2280", "4200", "8210", "3010",
];

pub const MOVERS_LIMIT_MIN: usize = 5;
pub const MOVERS_LIMIT_MAX: usize = 50;

/// Saudi market dashboards in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tasi",
    author,
    version,
    about = "Live market and fundamentals dashboards for the Saudi stock market",
    long_about = "tasi renders the TASI market overview, movers, sectors, stock lookup, \
watchlist and fundamentals dashboards from the SAHMK market-data API.\n\
\n\
Set SAHMK_API_KEY (or put it in a .env file) before use."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Override the API base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to the fundamentals CSV.
    #[arg(long, global = true, default_value = DEFAULT_DATASET_PATH)]
    pub dataset: PathBuf,

    /// Disable the 60 second response cache.
    #[arg(long, global = true, default_value_t = false)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text tables.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Page(Page),

    /// Interactive session: type page commands, `refresh` or `quit`.
    Shell,
}

/// One dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Page {
    /// Index value, market mood, breadth and top five gainers/losers.
    Overview,

    /// Ranked movers list.
    ///
    ///   tasi movers --kind losers --limit 25
    Movers(MoversArgs),

    /// Sector performance sorted by average change.
    Sectors,

    /// Quote, liquidity flow and company profile for one symbol.
    ///
    ///   tasi lookup 1120
    Lookup(LookupArgs),

    /// Batch quotes with net liquidity for a list of symbols.
    ///
    ///   tasi watchlist 2222,1120 7010
    Watchlist(WatchlistArgs),

    /// Fundamentals dashboards backed by the local dataset.
    Fundamentals(FundamentalsArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct MoversArgs {
    #[arg(long, value_enum, default_value_t = MoversKindArg::Gainers)]
    pub kind: MoversKindArg,

    /// Number of rows (5 to 50).
    #[arg(long, default_value_t = 15)]
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MoversKindArg {
    Gainers,
    Losers,
    Volume,
    Value,
}

impl From<MoversKindArg> for MoversKind {
    fn from(value: MoversKindArg) -> Self {
        match value {
            MoversKindArg::Gainers => MoversKind::Gainers,
            MoversKindArg::Losers => MoversKind::Losers,
            MoversKindArg::Volume => MoversKind::Volume,
            MoversKindArg::Value => MoversKind::Value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct LookupArgs {
    #[arg(default_value = "2222")]
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct WatchlistArgs {
    /// Symbols, comma or space separated. Defaults to the TASI leaders.
    pub symbols: Vec<String>,
}

impl WatchlistArgs {
    pub fn resolved_symbols(&self) -> Vec<String> {
        let symbols: Vec<String> = self
            .symbols
            .iter()
            .flat_map(|raw| raw.split(','))
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
            .map(str::to_owned)
            .collect();

        if symbols.is_empty() {
            DEFAULT_WATCHLIST.iter().map(|s| (*s).to_owned()).collect()
        } else {
            symbols
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct FundamentalsArgs {
    #[command(subcommand)]
    pub view: FundamentalsView,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum FundamentalsView {
    /// Market header plus the top ten dividend payers.
    Summary,
    /// P/E vs P/B positioning and sector ROE.
    Valuation,
    /// Shariah screening, debt/equity and current ratio.
    Solvency,
    /// ROE and net margin rankings.
    Profitability,
    /// Single-stock deep dive with radar scores and peer comparison.
    Stock {
        #[arg(default_value = "2222")]
        symbol: String,
    },
}

/// Parser for one line typed into `tasi shell`.
#[derive(Debug, Parser)]
#[command(name = "tasi", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub page: Page,
}
